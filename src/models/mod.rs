mod user;

pub use user::{NewUser, User, UserChangeset, UserSearch};
