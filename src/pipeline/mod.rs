pub mod clock;
pub mod deck;
pub mod playback;
pub mod setlist;

#[cfg(test)]
pub(crate) mod test_fixture;
