//! Error values carried through the fail-fast protocol.
//!
//! An [`Error`] wraps any caller-defined error together with two tags that
//! the boundary uses to classify it:
//!
//! - [`Kind`] identifies the concrete type of the wrapped value. Accepted
//!   kinds at a boundary are compared against it by equality.
//! - [`Class`] separates recoverable failures (domain errors, assertion
//!   failures) from reserved runtime faults that must never be converted.
//!
//! An [`Abort`] is the failure currently propagating through a unit, i.e.
//! the `Err` side of a [`Flow`].

use std::any::{Any, TypeId};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Result type returned by fail-fast unit bodies.
///
/// `Err` is the in-flight abort. Apply `?` to propagate it up to the unit
/// boundary.
pub type Flow<T> = Result<T, Abort>;

/// Built-in error kind raised by failed formatted assertions.
///
/// Always convertible at a boundary, whatever its accepted-kind list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    /// Create an assertion error from an already rendered message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The rendered assertion message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Classification of an [`Error`] at a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    /// Caller-defined error. Converted when the boundary accepts its kind.
    Domain,
    /// [`AssertionError`]. Converted by every boundary.
    Assertion,
    /// Reserved runtime/internal fault (invalid cast, out-of-range access,
    /// broken runtime invariant). Never converted.
    Fault,
}

/// Type tag of an error value.
///
/// Kinds are compared after stripping one level of indirection: `E`,
/// `&E`, `Box<E>` and `Arc<E>` are all the same kind, on the raised side
/// and on the accepted side alike.
#[derive(Clone, Copy)]
pub struct Kind {
    id: TypeId,
    name: &'static str,
    pointee: &'static str,
}

impl Kind {
    /// Kind of the type `E`.
    pub fn of<E: ?Sized + 'static>() -> Self {
        let name = std::any::type_name::<E>();
        Self {
            id: TypeId::of::<E>(),
            name,
            pointee: pointee_name(name),
        }
    }

    /// Kind of an example value. Only its type is used.
    pub fn of_val<E: ?Sized + 'static>(_example: &E) -> Self {
        Self::of::<E>()
    }

    /// Kind of the built-in [`AssertionError`].
    pub fn assertion() -> Self {
        Self::of::<AssertionError>()
    }

    /// Fully qualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

const POINTERS: [&str; 3] = ["alloc::boxed::Box<", "alloc::sync::Arc<", "alloc::rc::Rc<"];

// Generic type ids cannot be unwrapped, so the pointee is read off the type
// name: `&E`, `Box<E>` and `Arc<E>` all become `E`.
fn pointee_name(name: &'static str) -> &'static str {
    if let Some(rest) = name.strip_prefix("&mut ").or_else(|| name.strip_prefix('&')) {
        return rest;
    }
    POINTERS
        .iter()
        .find_map(|pointer| name.strip_prefix(*pointer)?.strip_suffix('>'))
        .map(|inner| inner.strip_suffix(", alloc::alloc::Global").unwrap_or(inner))
        .unwrap_or(name)
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id || self.pointee == other.pointee
    }
}

impl Eq for Kind {}

impl std::hash::Hash for Kind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pointee.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl From<&Error> for Kind {
    fn from(err: &Error) -> Self {
        err.kind()
    }
}

// std conversion errors standing in for invalid casts and out-of-range
// access. Wrapping one of these always yields a `Class::Fault`.
fn is_host_fault(kind: Kind) -> bool {
    [
        Kind::of::<std::num::TryFromIntError>(),
        Kind::of::<std::array::TryFromSliceError>(),
        Kind::of::<std::char::CharTryFromError>(),
        Kind::of::<std::cell::BorrowError>(),
        Kind::of::<std::cell::BorrowMutError>(),
    ]
    .contains(&kind)
}

fn class_of(kind: Kind) -> Class {
    if kind == Kind::assertion() {
        Class::Assertion
    } else if is_host_fault(kind) {
        Class::Fault
    } else {
        Class::Domain
    }
}

/// Opaque, immutable error value flowing through the protocol.
///
/// Cloning is cheap: the wrapped value is shared.
///
/// Does not implement [`std::error::Error`] itself: any standard error
/// converts into it with `?` or `.into()`. [`Error::as_std`] gives the
/// wrapped value as a trait object.
#[derive(Clone)]
pub struct Error {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
    kind: Kind,
    class: Class,
}

impl Error {
    /// Wrap a caller-defined error. The class is derived from its kind.
    ///
    /// `E` may itself be a `Box` or `Arc`; the kind still names the pointee.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_arc(Arc::new(error))
    }

    /// Wrap a boxed error. The kind is the one of `E`, not of `Box<E>`.
    pub fn from_box<E>(error: Box<E>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_arc::<E>(Arc::from(error))
    }

    /// Wrap a shared error. The kind is the one of `E`, not of `Arc<E>`.
    pub fn from_arc<E>(error: Arc<E>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let kind = Kind::of::<E>();
        Self {
            inner: error,
            kind,
            class: class_of(kind),
        }
    }

    /// Wrap an error as a reserved runtime fault.
    ///
    /// Faults are re-raised by every boundary, whatever its accepted kinds.
    pub fn fault<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            class: Class::Fault,
            ..Self::new(error)
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn is_fault(&self) -> bool {
        self.class == Class::Fault
    }

    /// True when the wrapped value is an [`AssertionError`].
    pub fn is_assertion(&self) -> bool {
        self.kind == Kind::assertion()
    }

    /// True when the wrapped value is of type `E`.
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.kind == Kind::of::<E>()
    }

    /// Borrow the wrapped value as `E`, if that is its type. A wrapped
    /// `Box<E>` or `Arc<E>` is looked through.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let inner = self.as_std();
        inner
            .downcast_ref::<E>()
            .or_else(|| inner.downcast_ref::<Box<E>>().map(|e| &**e))
            .or_else(|| inner.downcast_ref::<Arc<E>>().map(|e| &**e))
    }

    /// The wrapped value as a standard error trait object.
    pub fn as_std(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    /// Human-readable message of the wrapped value.
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// True when both values share the same wrapped error instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl AsRef<dyn StdError + Send + Sync + 'static> for Error {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.as_std()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("class", &self.class)
            .field("error", &self.inner)
            .finish()
    }
}

/// The failure currently propagating through a unit.
pub enum Abort {
    /// An error raised through this protocol.
    Error(Error),
    /// A payload that is not an error of this protocol. Always re-raised.
    Foreign(Box<dyn Any + Send + 'static>),
}

impl Abort {
    /// Wrap an arbitrary non-error payload.
    pub fn foreign<P: Any + Send + 'static>(payload: P) -> Self {
        Self::Foreign(Box::new(payload))
    }

    /// Classify a payload captured from an unwinding panic.
    ///
    /// An `Abort` re-raised by a boundary is restored unchanged; any other
    /// payload becomes [`Abort::Foreign`].
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        match payload.downcast::<Abort>() {
            Ok(abort) => *abort,
            Err(other) => Self::Foreign(other),
        }
    }

    /// The carried error, unless the abort is foreign.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(err),
            Self::Foreign(_) => None,
        }
    }

    /// Take the carried error, or give the foreign abort back.
    pub fn into_error(self) -> Result<Error, Self> {
        match self {
            Self::Error(err) => Ok(err),
            foreign @ Self::Foreign(_) => Err(foreign),
        }
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::Foreign(_))
    }

    fn foreign_message(payload: &(dyn Any + Send)) -> &str {
        if let Some(s) = payload.downcast_ref::<&'static str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "unclassified abort"
        }
    }
}

impl From<Error> for Abort {
    fn from(err: Error) -> Self {
        Self::Error(err)
    }
}

impl<E> From<E> for Abort
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::Error(Error::new(error))
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => fmt::Display::fmt(err, f),
            Self::Foreign(payload) => f.write_str(Self::foreign_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Self::Foreign(payload) => f
                .debug_tuple("Foreign")
                .field(&Self::foreign_message(payload.as_ref()))
                .finish(),
        }
    }
}
