#!/usr/bin/env run
// c
x
