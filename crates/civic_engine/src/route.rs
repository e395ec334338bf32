use url::{Origin, Url};

use crate::MalformedUriError;

/// Resolve a media route scraped from a page against a known absolute URL on
/// the same site.
///
/// Absolute routes are returned untouched. Relative routes keep only the
/// sibling's origin (scheme, host, port); the sibling's own path is dropped,
/// and exactly one `/` joins origin and route.
pub fn resolve_route(sibling: &str, route: &str) -> Result<String, MalformedUriError> {
    let route = route.trim();
    if Url::parse(route).is_ok() {
        return Ok(route.to_string());
    }

    let malformed = || MalformedUriError {
        sibling: sibling.to_string(),
        route: route.to_string(),
    };
    let base = Url::parse(sibling.trim()).map_err(|_| malformed())?;
    let origin = match base.origin() {
        origin @ Origin::Tuple(..) => origin.ascii_serialization(),
        Origin::Opaque(_) => return Err(malformed()),
    };

    Ok(format!("{origin}/{}", route.trim_start_matches('/')))
}
