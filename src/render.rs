/// Premultiplied RGBA8 compositing math.
pub mod composite;
/// Layer image decoding and size normalization.
pub mod decode;
/// Layer byte sources.
pub mod fetch;
/// Fetch, composite and encode a layer stack.
pub mod renderer;
