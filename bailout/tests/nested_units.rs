//! Nested unit tests — how conversions and re-raises look from the parent
//! of a unit that ran its own boundary.

use bailout::{Abort, Error, FailFast, Flow, Handler, Kind};
use std::panic::{AssertUnwindSafe, catch_unwind};

#[derive(Debug, thiserror::Error)]
#[error("specific failure")]
struct SpecificError;

#[derive(Debug, thiserror::Error)]
#[error("different failure")]
struct DifferentError;

/// Inner unit B: converts any domain error it raises.
struct Inner {
    handler: Handler,
}

impl FailFast for Inner {
    fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl Inner {
    fn run(&self, fail: bool) -> Result<u32, Error> {
        self.catch(self.body(fail), &[])
    }

    fn body(&self, fail: bool) -> Flow<u32> {
        self.assert(!fail, DifferentError)?;
        Ok(1)
    }
}

/// Outer unit A: calls B and records what it observed.
struct Outer {
    handler: Handler,
    inner: Inner,
}

impl FailFast for Outer {
    fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl Outer {
    fn run(&self, fail_inner: bool) -> Result<Option<String>, Error> {
        self.catch(self.body(fail_inner), &[])
    }

    fn body(&self, fail_inner: bool) -> Flow<Option<String>> {
        // B already resolved its abort; A only sees a returned value.
        let observed = self.inner.run(fail_inner).err().map(|e| e.message());
        Ok(observed)
    }
}

/// Unit C: only accepts `SpecificError`.
struct Picky {
    handler: Handler,
}

impl FailFast for Picky {
    fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl Picky {
    fn run(&self, raise: Error) -> Result<Result<(), Error>, Abort> {
        self.resolve(self.must(Err::<(), _>(raise)), &[Kind::of::<SpecificError>()])
    }

    fn run_or_unwind(&self, raise: Error) -> Result<(), Error> {
        self.catch(self.must(Err::<(), _>(raise)), &[Kind::of::<SpecificError>()])
    }
}

/// Parent of C that forwards re-raises to its own boundary with `?`.
struct Parent {
    handler: Handler,
    child: Picky,
}

impl FailFast for Parent {
    fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl Parent {
    fn run(&self, raise: Error, accepted: &[Kind]) -> Result<Result<&'static str, Error>, Abort> {
        self.resolve(self.body(raise), accepted)
    }

    fn body(&self, raise: Error) -> Flow<&'static str> {
        match self.child.run(raise)? {
            Ok(()) => Ok("child succeeded"),
            Err(_) => Ok("child returned an error"),
        }
    }
}

fn handler() -> Handler {
    Handler::new()
}

// ─── Tests ──────────────────────────────────────────────────────────

/// Test: B converts its error; A's boundary never sees an abort.
#[test]
fn inner_conversion_is_invisible_to_outer() {
    let outer = Outer {
        handler: handler(),
        inner: Inner { handler: handler() },
    };

    let observed = outer.run(true).expect("outer must complete normally");
    assert_eq!(observed.as_deref(), Some("different failure"));

    let observed = outer.run(false).expect("outer must complete normally");
    assert!(observed.is_none());
}

/// Test: C accepts the specific kind and converts it.
#[test]
fn picky_unit_converts_accepted_kind() {
    let picky = Picky { handler: handler() };
    let result = picky.run(Error::new(SpecificError));
    assert!(matches!(result, Ok(Err(ref e)) if e.is::<SpecificError>()));
}

/// Test: C re-raises a different kind; its caller sees the original abort.
#[test]
fn picky_unit_reraises_other_kind() {
    let picky = Picky { handler: handler() };
    let raised = Error::new(DifferentError);

    let abort = picky.run(raised.clone()).expect_err("must re-raise");
    assert!(abort.error().is_some_and(|e| e.ptr_eq(&raised)));
}

/// Test: the re-raise repeats the state machine in the parent frame.
#[test]
fn reraise_reaches_parent_boundary() {
    let parent = Parent {
        handler: handler(),
        child: Picky { handler: handler() },
    };

    // Parent accepts everything: the child's re-raise becomes its error.
    let result = parent.run(Error::new(DifferentError), &[]);
    assert!(matches!(result, Ok(Err(ref e)) if e.is::<DifferentError>()));

    // Parent is picky as well: the abort keeps propagating.
    let result = parent.run(Error::new(DifferentError), &[Kind::of::<SpecificError>()]);
    assert!(result.is_err());

    // Child converted: the parent completes normally.
    let result = parent.run(Error::new(SpecificError), &[]);
    assert!(matches!(result, Ok(Ok("child returned an error"))));
}

/// Test: a fault re-raised by the child stays a fault in every parent.
#[test]
fn fault_escapes_all_frames() {
    let parent = Parent {
        handler: handler(),
        child: Picky { handler: handler() },
    };
    let fault = Error::fault(SpecificError);

    let abort = parent.run(fault, &[]).expect_err("fault must escape");
    assert!(abort.error().is_some_and(Error::is_fault));
}

/// Test: with `catch`, the re-raise unwinds to the caller unchanged.
#[test]
fn catch_reraise_unwinds_to_caller() {
    let picky = Picky { handler: handler() };
    let raised = Error::new(DifferentError);

    let payload = catch_unwind(AssertUnwindSafe(|| picky.run_or_unwind(raised.clone())))
        .expect_err("must unwind");
    let abort = Abort::from_panic(payload);
    assert!(abort.error().is_some_and(|e| e.ptr_eq(&raised)));
}
