// REST surface of the Innkeep backend.
//
// `client` owns transport and envelope handling; every other module adds
// one endpoint family to `ApiClient`.

pub mod client;

mod activities;
mod auth;
mod backgrounds;
mod dining;
mod guests;
pub mod images;
mod mdm;
mod properties;
mod property_info;
mod streaming;

pub use client::ApiClient;
pub use images::ImageUpload;
