pub mod catalog;
pub mod http;
pub mod posters;
pub mod recommendation;
pub mod reviews;
pub mod serving;
