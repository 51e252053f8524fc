mod common;
mod identity;
mod session;

pub use common::{EntityRef, Link, Tags};
pub use identity::{AuthenticatorDetail, IdentityExtendValidateEnrollmentRequest};
pub use session::{
    ApiSessionDetail, ApiVersion, DialBind, EdgeRouterDetail, ServiceDetail, SessionDetail,
    SessionEdgeRouter, Version,
};
