(1u7 'ab'
