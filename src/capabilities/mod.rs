//! Capabilities the review list core asks the shell to carry out: redraws,
//! review pages and photo bytes.

mod photos;
mod reviews;

pub use crux_core::render::Render;

pub use self::photos::{
    decode_photo, validate_photo_url, PhotoBytesResult, PhotoOperation, Photos, MAX_URL_LENGTH,
};
pub use self::reviews::{PageResult, Reviews, ReviewsOperation};

use crate::app::ReviewsApp;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "ReviewsApp")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub reviews: Reviews<Event>,
    pub photos: Photos<Event>,
}
