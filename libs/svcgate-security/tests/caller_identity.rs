#![allow(clippy::unwrap_used, clippy::expect_used)]

use svcgate_security::{CallerContext, Principal, normalize_uid};

#[test]
fn caller_context_exposes_principal_identity() {
    let principal = Principal::new("alice@EXAMPLE.ORG", b"ticket".to_vec());
    let ctx = CallerContext::builder().principal(principal).build();

    let principal = ctx.principal().expect("principal present");
    assert_eq!(principal.role(), "EXAMPLE.ORG");
    assert_eq!(ctx.uid(), Some("alice@EXAMPLE.ORG"));
    assert_eq!(normalize_uid(ctx.uid().unwrap()), "alice");
}

#[test]
fn anonymous_context_has_no_uid() {
    let ctx = CallerContext::anonymous();
    assert_eq!(ctx.uid(), None);
    assert!(ctx.remote_addr().is_none());
}
