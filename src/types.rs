use std::sync::Arc;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;

use crate::{body::VigilBody, handler::Handler};

pub type Request = http::Request<VigilBody>;
pub type Response = http::Response<VigilBody>;

pub type BoxBody = UnsyncBoxBody<Bytes, BoxError>;
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type BoxHandler = Arc<dyn Handler>;
