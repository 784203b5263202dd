mod title;
mod user;

pub use title::{Format, Genre, Platform, Title, TitleType};
pub use user::{ProfileUpdate, Subscription, User};
