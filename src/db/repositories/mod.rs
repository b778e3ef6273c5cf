mod interviews;
mod users;
