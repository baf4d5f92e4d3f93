pub mod category;
pub mod movie;
pub mod user;

pub use category::{Category, MAX_CATEGORY_NAME_LEN};
pub use movie::{Movie, MovieChanges, NewMovie, MAX_MOVIE_NAME_LEN};
pub use user::{NewUser, User, UserChanges};
