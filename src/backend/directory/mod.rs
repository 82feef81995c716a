//! External directories the chat subsystem reads: users and the friend graph.

pub mod friends;
pub mod users;

pub use friends::{FriendGraph, MemoryFriendGraph, PgFriendGraph};
pub use users::{MemoryUserDirectory, PgUserDirectory, UserDirectory};
