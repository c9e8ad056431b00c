§ x "ab
