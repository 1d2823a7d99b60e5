// lib.rs - Paginated review list core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod prefetch;
pub mod rating;
pub mod services;
pub mod state;
pub mod table;
pub mod text;

pub use app::{decode_page, ListSnapshot, Model, ReviewsApp};
pub use capabilities::{Capabilities, Effect, PhotoOperation, ReviewsOperation};
pub use config::{PhotoDecodeConfig, ReviewsConfig};
pub use controller::ReviewsController;
pub use error::{ConfigError, ErrorKind, ReviewsError};
pub use event::Event;
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use layout::{compute_layout, LayoutContext, RowLayout};
pub use model::{
    CountRow, ExpandHandle, Photo, Rating, Review, ReviewRow, ReviewsPage, RowId, RowItem,
    StyledText, TextStyle,
};
pub use prefetch::{PrefetchPolicy, ScrollGeometry};
pub use rating::RatingRenderer;
pub use services::{
    BundledReviewsProvider, PhotoFetcher, ReviewsProvider, Services, StaticPhotoFetcher,
};
pub use state::ListState;
pub use table::{ReviewsTable, RowBinding, RowCell};
pub use text::{FixedWidthMeasurer, TextMeasurer};
