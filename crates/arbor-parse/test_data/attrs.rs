#![doc]
#[a(b)] fn
