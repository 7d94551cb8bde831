pub(crate) mod hashing;

#[cfg(test)]
pub(crate) mod manual_builder;
