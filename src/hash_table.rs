//! Building blocks of [`HashMap`](crate::HashMap): owned chains, the bucket array, and the
//! coordinator that serializes bucket access against resizing.

pub(crate) mod bucket_array;
pub(crate) mod chain;
pub(crate) mod coordinator;
