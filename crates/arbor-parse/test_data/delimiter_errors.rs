{ ( a } ]
