mod setlist_loader;

pub use setlist_loader::{FetchRequest, LoadedSession, SetlistLoader, start_loader};
