//! # Handlers
//!
//! Command handlers are plain closures. A typed handler takes between zero and ten
//! parameters, each of a type implementing [`CommandArg`]; a raw handler takes the
//! whole [`ParseResult`] and bypasses arity and type checks.
//!
//! Every closure arity goes through the single [`IntoHandler`] trait, implemented
//! by macro, so the registry stores one type-erased call no matter the arity.

use crate::models::{ArgSpec, ArgType, ArgValue, Number, ParseResult, TypeCategory};
use rust_decimal::Decimal;

/// A value that failed to convert into its declared slot type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingError {
    pub index: usize,
    pub expected: TypeCategory,
    pub supplied: TypeCategory,
}

/// Type-erased typed handler. `None` slots receive the parameter's default value.
pub type TypedCall = Box<dyn FnMut(Vec<Option<ArgValue>>) -> Result<(), BindingError>>;

/// Type-erased raw handler.
pub type RawCall = Box<dyn FnMut(&ParseResult)>;

/// The single execution slot of a command definition.
pub(crate) enum Handler {
    Typed { arity: usize, call: TypedCall },
    Raw(RawCall),
}

/// Introspection view of the attached handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    NoArg,
    Typed(usize),
    Raw,
}

impl Handler {
    pub(crate) fn kind(&self) -> HandlerKind {
        match self {
            Self::Typed { arity: 0, .. } => HandlerKind::NoArg,
            Self::Typed { arity, .. } => HandlerKind::Typed(*arity),
            Self::Raw(_) => HandlerKind::Raw,
        }
    }
}

// --- ARGUMENT TYPES ---

/// A Rust type a handler parameter may have.
///
/// Implemented for `String`, `bool`, `f32`, `f64` and `Decimal`, and for the
/// nullable `Option<_>` form of each.
pub trait CommandArg: Sized + 'static {
    /// The declared type registered for this parameter.
    const SPEC: ArgSpec;

    /// Converts a bound value; `None` asks for the default (empty, `false`, zero or `None`).
    fn from_bound(value: Option<ArgValue>) -> Option<Self>;
}

/// The plain (non-nullable) argument types.
trait ScalarArg: Sized + 'static {
    const ARG_TYPE: ArgType;

    fn from_value(value: ArgValue) -> Option<Self>;

    fn default_value() -> Self;
}

impl ScalarArg for String {
    const ARG_TYPE: ArgType = ArgType::String;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::String(s) | ArgValue::Identifier(s) => Some(s),
            _ => None,
        }
    }

    fn default_value() -> Self {
        Self::new()
    }
}

impl ScalarArg for bool {
    const ARG_TYPE: ArgType = ArgType::Bool;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn default_value() -> Self {
        false
    }
}

impl ScalarArg for f32 {
    const ARG_TYPE: ArgType = ArgType::Single;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Number(Number::Single(n)) => Some(n),
            _ => None,
        }
    }

    fn default_value() -> Self {
        0.0
    }
}

impl ScalarArg for f64 {
    const ARG_TYPE: ArgType = ArgType::Double;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Number(Number::Double(n)) => Some(n),
            _ => None,
        }
    }

    fn default_value() -> Self {
        0.0
    }
}

impl ScalarArg for Decimal {
    const ARG_TYPE: ArgType = ArgType::Decimal;

    fn from_value(value: ArgValue) -> Option<Self> {
        match value {
            ArgValue::Number(Number::Decimal(n)) => Some(n),
            _ => None,
        }
    }

    fn default_value() -> Self {
        Self::ZERO
    }
}

macro_rules! impl_command_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CommandArg for $ty {
                const SPEC: ArgSpec = ArgSpec::new(<$ty as ScalarArg>::ARG_TYPE, false);

                fn from_bound(value: Option<ArgValue>) -> Option<Self> {
                    match value {
                        Some(value) => <$ty as ScalarArg>::from_value(value),
                        None => Some(<$ty as ScalarArg>::default_value()),
                    }
                }
            }

            impl CommandArg for Option<$ty> {
                const SPEC: ArgSpec = ArgSpec::new(<$ty as ScalarArg>::ARG_TYPE, true);

                fn from_bound(value: Option<ArgValue>) -> Option<Self> {
                    match value {
                        Some(value) => <$ty as ScalarArg>::from_value(value).map(Some),
                        None => Some(None),
                    }
                }
            }
        )*
    };
}

impl_command_arg!(String, bool, f32, f64, Decimal);

fn bind_slot<T: CommandArg>(index: usize, value: Option<ArgValue>) -> Result<T, BindingError> {
    let supplied = value
        .as_ref()
        .map_or(TypeCategory::Unknown, ArgValue::category);
    T::from_bound(value).ok_or(BindingError {
        index,
        expected: T::SPEC.arg_type.category(),
        supplied,
    })
}

// --- CLOSURE ADAPTERS ---

/// Conversion of a typed closure into a registry handler.
///
/// `Args` is the tuple of the closure's parameter types; it only exists to keep
/// the per-arity implementations apart.
pub trait IntoHandler<Args>: 'static {
    /// The declared types of the closure's parameters, in order.
    fn parameter_specs() -> Vec<ArgSpec>;

    /// Erases the closure into a call over bound slot values.
    fn into_handler(self) -> TypedCall;
}

macro_rules! impl_into_handler {
    ($($arg:ident $var:ident),*) => {
        impl<F, $($arg),*> IntoHandler<($($arg,)*)> for F
        where
            F: FnMut($($arg),*) + 'static,
            $($arg: CommandArg,)*
        {
            fn parameter_specs() -> Vec<ArgSpec> {
                vec![$(<$arg as CommandArg>::SPEC),*]
            }

            #[allow(unused_mut, unused_variables, unused_assignments)]
            fn into_handler(self) -> TypedCall {
                let mut handler = self;
                Box::new(move |values: Vec<Option<ArgValue>>| {
                    let mut values = values.into_iter();
                    let mut index = 0;
                    $(
                        let $var = bind_slot::<$arg>(index, values.next().flatten())?;
                        index += 1;
                    )*
                    handler($($var),*);
                    Ok(())
                })
            }
        }
    };
}

impl_into_handler!();
impl_into_handler!(A1 a1);
impl_into_handler!(A1 a1, A2 a2);
impl_into_handler!(A1 a1, A2 a2, A3 a3);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9, A10 a10);
