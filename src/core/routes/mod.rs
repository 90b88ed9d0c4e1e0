//! Route classification and the path-map transform seam

pub mod classifier;
pub mod transform;

pub use classifier::{
    is_api_route, is_internal_page, ApiRouteMapping, ClassifiedRoutes, RouteClassifier,
    ERROR_PAGE,
};
pub use transform::{ConfiguredPathMap, IdentityTransform, PathMapTransform, TransformContext};
