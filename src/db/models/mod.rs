pub mod user;

pub use user::UserAccount;
