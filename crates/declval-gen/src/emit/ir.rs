// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Emission IR.
//!
//! The emitter decides *what* runs in which order; the backend decides how
//! it is spelled. Every statement operates on the three names in scope in
//! generated code: `obj`, `old_obj` and `fld_path`.

/// Whole generated file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    /// Union membership tables, sorted by name.
    pub unions:        Vec<UnionStatic>,
    /// Validation functions, sorted by name.
    pub functions:     Vec<Function>,
    /// Scheme registrations, one per root, sorted by function name.
    pub registrations: Vec<Registration>
}

/// File-scope `static` describing one discriminated union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionStatic {
    /// Name of the static.
    pub name:          String,
    /// Serialized name of the discriminator.
    pub discriminator: String,
    /// `(member serialized name, discriminator value)`.
    pub members:       Vec<(String, String)>
}

/// One `validate_*` function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Rust spelling of the validated type.
    pub ty:   String,
    /// Statements between the error list declaration and its return.
    pub body: Block
}

/// Entry point registration for one root type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Rust spelling of the root type.
    pub ty:       String,
    /// Function validating the whole value.
    pub function: String,
    /// `status` subresource dispatch, when the root has one.
    pub status:   Option<StatusDispatch>
}

/// How the `status` subresource of a root is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusDispatch {
    /// Call the function of the status type.
    Function {
        /// Declared name of the field serialized as `status`.
        field:    String,
        /// Function of the field type.
        function: String
    },
    /// The status type has no validations.
    NoValidation(String)
}

/// Sequence of statements.
pub type Block = Vec<Stmt>;

/// How the current value is passed to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForm {
    /// `obj` is already an `Option<&T>`.
    Pointer,
    /// `obj` is a `&T` passed where `Option<&T>` is expected.
    WrapSome,
    /// `obj` is a `&T` passed as is.
    Direct
}

/// Rendered rule argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Rust literal token.
    Literal(String),
    /// Reference to a file-scope static.
    Static(String),
    /// String view of a member of `obj`.
    MemberStr(String),
    /// Presence of members of `obj`.
    MemberPresence(Vec<String>)
}

/// How an `Option` is unwrapped to `Option<&T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    /// Not optional.
    Plain,
    /// `Option<T>`, through `as_ref`.
    Option,
    /// `Option<Box<T>>`, through `as_deref`.
    Boxed
}

impl Via {
    /// Access mode for a value with the given pointer-ness.
    pub const fn new(pointer: bool, boxed: bool) -> Self {
        match (pointer, boxed) {
            (false, _) => Self::Plain,
            (true, false) => Self::Option,
            (true, true) => Self::Boxed
        }
    }

    /// Check if the value may be absent.
    pub const fn is_pointer(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// How a scope reads its value.
pub trait Binding {
    /// Access mode of the value.
    fn via(&self) -> Via;
}

/// Struct field; path qualified with the serialized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    /// Declared name.
    pub name: String,
    /// Serialized name.
    pub wire: String,
    /// Access mode.
    pub via:  Via
}

/// List element; path qualified with the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListElem {
    /// Access mode.
    pub via:        Via,
    /// The old element is found through the list-map index.
    pub correlated: bool
}

/// Map key; path unqualified, no old value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapKey;

/// Map value; path qualified with the key, old value looked up by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapValue {
    /// Access mode.
    pub via: Via
}

impl Binding for FieldAccess {
    fn via(&self) -> Via {
        self.via
    }
}

impl Binding for ListElem {
    fn via(&self) -> Via {
        self.via
    }
}

impl Binding for MapKey {
    fn via(&self) -> Via {
        Via::Plain
    }
}

impl Binding for MapValue {
    fn via(&self) -> Via {
        self.via
    }
}

/// Closure scope validating one derived value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope<B> {
    /// Value source.
    pub binding: B,
    /// Rust spelling of the value type, pointer stripped.
    pub ty:      String,
    /// Statements inside the closure.
    pub body:    Block
}

impl<B: Binding> Scope<B> {
    /// Check if `obj` is an `Option<&T>` inside the scope.
    pub fn is_pointer(&self) -> bool {
        self.binding.via().is_pointer()
    }
}

/// Key projection of a list declared as a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMapKey {
    /// Rust spelling of the element type.
    pub elem_type: String,
    /// Declared names of the key fields.
    pub fields:    Vec<String>
}

/// One statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `// text`.
    Comment(String),

    /// Rule call appended to the error list.
    Check {
        /// Path of the primitive relative to the runtime crate.
        function: String,
        /// Form of the value argument.
        value:    ValueForm,
        /// Arguments after `old_obj`.
        args:     Vec<Arg>,
        /// Return the error list when the call fails.
        fatal:    bool
    },

    /// Statements run only when `obj` is present, with `obj` rebound to
    /// the present value.
    Guarded(Block),

    /// Call of another generated function on the current value.
    CallType {
        /// Function name.
        function: String
    },

    /// Closure scope for a field.
    Scope(Scope<FieldAccess>),

    /// Loop over list elements.
    ListLoop {
        /// Correlation with old elements.
        list_map: Option<ListMapKey>,
        /// Per-element scope.
        elem:     Scope<ListElem>
    },

    /// Loop over map entries.
    MapLoop {
        /// Per-key scope.
        key: Option<Scope<MapKey>>,
        /// Per-value scope.
        val: Option<Scope<MapValue>>
    }
}
