pub mod prelude;

pub mod documents;
pub mod sessions;
pub mod users;
