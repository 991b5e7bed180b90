//! This module provides the `VigilBody` struct, which is a wrapper around a boxed HTTP body.
//! Requests coming off the wire are converted into it before dispatch, so handlers,
//! authenticators and tests all work with the same request type.

use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;

use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Body, Frame, SizeHint};

use crate::types::{BoxBody, BoxError};

/// The `VigilBody` struct is a wrapper around a boxed HTTP body (`BoxBody`).
///
/// # Example
///
/// ```rust
/// use vigil::body::VigilBody;
///
/// let empty_body = VigilBody::empty();
/// let string_body = VigilBody::from("Hello, world!".to_string());
/// ```
pub struct VigilBody(BoxBody);

impl VigilBody {
    /// Creates a new `VigilBody` from any body yielding `Bytes`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vigil::body::VigilBody;
    /// use http_body_util::Full;
    /// use bytes::Bytes;
    ///
    /// let body = VigilBody::new(Full::from(Bytes::from("Hello")));
    /// ```
    pub fn new<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self(body.map_err(|e| e.into()).boxed_unsync())
    }

    /// Creates an empty `VigilBody`.
    pub fn empty() -> Self {
        Self::new(Empty::new())
    }
}

impl fmt::Debug for VigilBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VigilBody").finish_non_exhaustive()
    }
}

impl Default for VigilBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<()> for VigilBody {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

macro_rules! body_from_impl {
    ($ty:ty) => {
        impl From<$ty> for VigilBody {
            fn from(buf: $ty) -> Self {
                Self::new(Full::from(buf))
            }
        }
    };
}

body_from_impl!(String);
body_from_impl!(&'static str);
body_from_impl!(Vec<u8>);
body_from_impl!(Bytes);

impl Body for VigilBody {
    type Data = Bytes;
    type Error = BoxError;

    #[inline]
    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.0).poll_frame(cx)
    }

    #[inline]
    fn size_hint(&self) -> SizeHint {
        self.0.size_hint()
    }

    #[inline]
    fn is_end_stream(&self) -> bool {
        self.0.is_end_stream()
    }
}
