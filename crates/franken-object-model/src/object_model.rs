//! ES2015 object model: values, property keys, property descriptors, ordinary
//! objects and the managed object heap.
//!
//! Key features:
//!
//! - **Descriptors**: a value slot or a get/set pair, each carrying its attribute flags
//! - **Prototype chains**: `[[Prototype]]` internal slot with bounded, cycle-safe traversal
//! - **Integrity levels**: freeze, seal, preventExtensions and their predicates
//! - **Ordered own keys**: integer indices, then strings and symbols in insertion order
//! - **Object classes**: arrays, functions, boxed primitives and regexps
//!
//! Invocation of accessors lives in [`crate::realm`]; this module only stores
//! and validates state.
//!
//! `#![forbid(unsafe_code)]`: no unsafe anywhere.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::object_builtins::ObjectOperation;

// ---------------------------------------------------------------------------
// PropertyKey: string or symbol
// ---------------------------------------------------------------------------

/// Symbol identity, allocated by the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Own-property key. Array-index strings sort ahead of other strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    /// String key.
    String(String),
    /// Symbol key.
    Symbol(SymbolId),
}

/// Largest canonical array index (2^32 - 2).
const MAX_ARRAY_INDEX: u64 = 4_294_967_294;

impl PropertyKey {
    /// Key for an integer index (`"0"`, `"1"`, ...).
    pub fn index(n: u32) -> Self {
        Self::String(n.to_string())
    }

    /// Returns the numeric value when this key is a canonical array index.
    ///
    /// `"01"` and `"+1"` are ordinary string keys, not indices.
    pub fn array_index(&self) -> Option<u32> {
        let Self::String(s) = self else {
            return None;
        };
        let n: u64 = s.parse().ok()?;
        if n > MAX_ARRAY_INDEX || n.to_string() != *s {
            return None;
        }
        u32::try_from(n).ok()
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.0),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<SymbolId> for PropertyKey {
    fn from(id: SymbolId) -> Self {
        Self::Symbol(id)
    }
}

// ---------------------------------------------------------------------------
// ObjectHandle: typed reference to heap objects
// ---------------------------------------------------------------------------

/// Index of an object slot in an `ObjectHeap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u32);

// ---------------------------------------------------------------------------
// JsValue: runtime value for the object model
// ---------------------------------------------------------------------------

/// Runtime value for the object model.
///
/// Numbers are IEEE doubles so that `NaN` and `-0` keep their identity.
/// The derived `PartialEq` is structural (so `NaN != NaN`); use
/// [`JsValue::strict_equals`] or [`JsValue::same_value`] for language
/// comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Symbol(SymbolId),
    Object(ObjectHandle),
}

impl JsValue {
    pub fn str(s: &str) -> Self {
        Self::Str(s.to_string())
    }

    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Self::Object(h) => Some(*h),
            _ => None,
        }
    }

    /// Strict equality (`===`, ES2015 §7.2.13).
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// SameValue comparison (ES2015 §7.2.9): `NaN` equals itself and `+0`
    /// differs from `-0`.
    pub fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    return true;
                }
                a.to_bits() == b.to_bits()
            }
            _ => self == other,
        }
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<ObjectHandle> for JsValue {
    fn from(h: ObjectHandle) -> Self {
        Self::Object(h)
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", number_to_string(*n)),
            Self::Str(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.0),
            Self::Object(h) => write!(f, "[object#{}]", h.0),
        }
    }
}

/// `Number::toString` for the values the object model produces.
///
/// Integral values below 1e21 print without a fraction; everything else uses
/// the shortest round-trip representation.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// PropertyDescriptor
// ---------------------------------------------------------------------------

/// Property descriptor (ES2015 §6.2.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyDescriptor {
    /// Plain value slot.
    Data {
        value: JsValue,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    /// Accessor property backed by `get`/`set` function objects.
    Accessor {
        get: Option<ObjectHandle>,
        set: Option<ObjectHandle>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyDescriptor {
    /// Default data descriptor (writable, enumerable, configurable), as
    /// created by assignment or an object literal.
    pub fn data(value: JsValue) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Writable, configurable but non-enumerable data descriptor (built-in
    /// methods and `constructor` links).
    pub fn data_hidden(value: JsValue) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable data descriptor.
    pub fn data_frozen(value: JsValue) -> Self {
        Self::Data {
            value,
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    /// Accessor descriptor as produced by `Object.defineProperty` with only
    /// `get`/`set`/`enumerable` given (`configurable` defaults to false).
    pub fn accessor(
        get: Option<ObjectHandle>,
        set: Option<ObjectHandle>,
        enumerable: bool,
    ) -> Self {
        Self::Accessor {
            get,
            set,
            enumerable,
            configurable: false,
        }
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => *configurable,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// Stored value, `None` for accessors.
    pub fn value(&self) -> Option<&JsValue> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// True only for writable data slots.
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { writable, .. } => *writable,
            Self::Accessor { .. } => false,
        }
    }

    pub fn set_non_configurable(&mut self) {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => {
                *configurable = false;
            }
        }
    }

    /// Clears `writable`; accessors are left alone.
    pub fn set_non_writable(&mut self) {
        if let Self::Data { writable, .. } = self {
            *writable = false;
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectError
// ---------------------------------------------------------------------------

/// Failures raised while manipulating heap objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectError {
    /// TypeError per ES2015.
    TypeError(String),
    /// Dangling handle.
    ObjectNotFound(ObjectHandle),
    /// `setPrototypeOf` would close a loop.
    PrototypeCycleDetected,
    /// Chain walk gave up after `max` links.
    PrototypeChainTooDeep { depth: u32, max: u32 },
}

impl ObjectError {
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Does this error surface to script code as a `TypeError`?
    ///
    /// `ObjectNotFound` is a heap integrity fault, never a language error.
    pub fn is_type_error(&self) -> bool {
        !matches!(self, Self::ObjectNotFound(_))
    }
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeError(msg) => write!(f, "TypeError: {msg}"),
            Self::ObjectNotFound(h) => write!(f, "object#{} not found", h.0),
            Self::PrototypeCycleDetected => write!(f, "TypeError: prototype chain cycle detected"),
            Self::PrototypeChainTooDeep { depth, max } => {
                write!(
                    f,
                    "TypeError: prototype chain depth {depth} exceeds max {max}"
                )
            }
        }
    }
}

impl std::error::Error for ObjectError {}

// ---------------------------------------------------------------------------
// PropertyMap: insertion-ordered own properties
// ---------------------------------------------------------------------------

/// Own properties in insertion order.
///
/// Redefining an existing key keeps its original position, matching the
/// ordering rules of `[[OwnPropertyKeys]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMap {
    entries: Vec<(PropertyKey, PropertyDescriptor)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &PropertyKey) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    pub fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut PropertyDescriptor> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d)
    }

    pub fn contains_key(&self, key: &PropertyKey) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace; returns the previous descriptor.
    pub fn insert(
        &mut self,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Option<PropertyDescriptor> {
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, desc)),
            None => {
                self.entries.push((key, desc));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.entries.iter().map(|(_, d)| d)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut PropertyDescriptor> {
        self.entries.iter_mut().map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ObjectClass: what kind of object an ordinary object is
// ---------------------------------------------------------------------------

/// Behavior of a function object when called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// The `Object` constructor itself (`Object(value)` boxes `value`).
    ObjectConstructor,
    /// One of the `Object.*` static operations.
    ObjectStatic(ObjectOperation),
    /// A script function with an empty body, usable as a constructor.
    Plain,
    /// Getter that appends `tag` to the realm journal and returns `returns`.
    RecordingGetter { tag: JsValue, returns: JsValue },
    /// Setter that appends `tag` to the realm journal.
    RecordingSetter { tag: JsValue },
}

/// Object class (the `[[Class]]`-like tag plus any wrapped internal slot).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    #[default]
    Ordinary,
    Array,
    Function(FunctionKind),
    BooleanWrapper(bool),
    NumberWrapper(f64),
    StringWrapper(String),
    SymbolWrapper(SymbolId),
    RegExp { source: String, flags: String },
}

impl ObjectClass {
    /// Tag as reported by `Object.prototype.toString`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ordinary => "Object",
            Self::Array => "Array",
            Self::Function(_) => "Function",
            Self::BooleanWrapper(_) => "Boolean",
            Self::NumberWrapper(_) => "Number",
            Self::StringWrapper(_) => "String",
            Self::SymbolWrapper(_) => "Symbol",
            Self::RegExp { .. } => "RegExp",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Primitive held by a wrapper object, if any.
    pub fn wrapped_primitive(&self) -> Option<JsValue> {
        match self {
            Self::BooleanWrapper(b) => Some(JsValue::Bool(*b)),
            Self::NumberWrapper(n) => Some(JsValue::Number(*n)),
            Self::StringWrapper(s) => Some(JsValue::Str(s.clone())),
            Self::SymbolWrapper(id) => Some(JsValue::Symbol(*id)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OrdinaryObject: the core object
// ---------------------------------------------------------------------------

/// Upper bound on `[[Prototype]]` links followed during lookups.
pub const MAX_PROTOTYPE_CHAIN_DEPTH: u32 = 1024;

/// An ordinary object with internal slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinaryObject {
    /// `[[Prototype]]` internal slot (None means end of chain).
    pub prototype: Option<ObjectHandle>,
    /// `[[Extensible]]` internal slot.
    pub extensible: bool,
    /// Own properties with descriptors, in insertion order.
    pub properties: PropertyMap,
    pub class: ObjectClass,
}

impl Default for OrdinaryObject {
    fn default() -> Self {
        Self {
            prototype: None,
            extensible: true,
            properties: PropertyMap::new(),
            class: ObjectClass::Ordinary,
        }
    }
}

impl OrdinaryObject {
    /// Empty ordinary object linked to `proto`.
    pub fn with_prototype(proto: Option<ObjectHandle>) -> Self {
        Self {
            prototype: proto,
            ..Self::default()
        }
    }

    /// Create an object of `class` with the given prototype.
    pub fn with_class(proto: Option<ObjectHandle>, class: ObjectClass) -> Self {
        Self {
            prototype: proto,
            class,
            ..Self::default()
        }
    }

    /// Builder-style property insertion used while constructing intrinsics.
    pub fn with_property(mut self, key: impl Into<PropertyKey>, desc: PropertyDescriptor) -> Self {
        self.properties.insert(key.into(), desc);
        self
    }

    // -- [[GetOwnProperty]] --------------------------------------------------

    pub fn get_own_property(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    // -- [[DefineOwnProperty]] -----------------------------------------------

    /// `[[DefineOwnProperty]](P, Desc)` with a complete descriptor.
    ///
    /// Returns `Ok(false)` when the definition is rejected (non-configurable
    /// conflict or non-extensible object).
    pub fn define_own_property(
        &mut self,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool, ObjectError> {
        let Some(current) = self.properties.get(&key) else {
            if !self.extensible {
                return Ok(false);
            }
            self.properties.insert(key, desc);
            return Ok(true);
        };

        if !current.is_configurable() {
            if desc.is_configurable() {
                return Ok(false);
            }
            if desc.is_enumerable() != current.is_enumerable() {
                return Ok(false);
            }
            if current.is_data() != desc.is_data() {
                return Ok(false);
            }
            if let (
                PropertyDescriptor::Data {
                    writable: current_w,
                    value: current_v,
                    ..
                },
                PropertyDescriptor::Data {
                    writable: new_w,
                    value: new_v,
                    ..
                },
            ) = (current, &desc)
                && !current_w
                && (*new_w || !current_v.same_value(new_v))
            {
                return Ok(false);
            }
            if let (
                PropertyDescriptor::Accessor {
                    get: cur_get,
                    set: cur_set,
                    ..
                },
                PropertyDescriptor::Accessor {
                    get: new_get,
                    set: new_set,
                    ..
                },
            ) = (current, &desc)
                && (cur_get != new_get || cur_set != new_set)
            {
                return Ok(false);
            }
        }
        self.properties.insert(key, desc);
        Ok(true)
    }

    // -- [[OwnPropertyKeys]] -------------------------------------------------

    /// Own keys: integer indices ascending, then string keys in insertion
    /// order, then symbol keys in insertion order.
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut int_keys: Vec<(u32, PropertyKey)> = Vec::new();
        let mut str_keys: Vec<PropertyKey> = Vec::new();
        let mut sym_keys: Vec<PropertyKey> = Vec::new();

        for key in self.properties.keys() {
            if let Some(n) = key.array_index() {
                int_keys.push((n, key.clone()));
            } else if key.is_symbol() {
                sym_keys.push(key.clone());
            } else {
                str_keys.push(key.clone());
            }
        }

        int_keys.sort_by_key(|(n, _)| *n);
        let mut result: Vec<PropertyKey> = int_keys.into_iter().map(|(_, k)| k).collect();
        result.extend(str_keys);
        result.extend(sym_keys);
        result
    }

    // -- Integrity levels ----------------------------------------------------

    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    /// Integrity level "frozen": nothing configurable, no writable value slots.
    pub fn freeze(&mut self) {
        self.extensible = false;
        for desc in self.properties.values_mut() {
            desc.set_non_configurable();
            desc.set_non_writable();
        }
    }

    /// Integrity level "sealed": every own property becomes non-configurable.
    pub fn seal(&mut self) {
        self.extensible = false;
        for desc in self.properties.values_mut() {
            desc.set_non_configurable();
        }
    }

    pub fn is_frozen(&self) -> bool {
        if self.extensible {
            return false;
        }
        self.properties
            .values()
            .all(|d| !d.is_configurable() && !d.is_writable())
    }

    pub fn is_sealed(&self) -> bool {
        if self.extensible {
            return false;
        }
        self.properties.values().all(|d| !d.is_configurable())
    }
}

// ---------------------------------------------------------------------------
// ObjectHeap: the managed object store
// ---------------------------------------------------------------------------

/// The object heap: arena of ordinary objects plus the symbol table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectHeap {
    objects: Vec<OrdinaryObject>,
    /// Description of every allocated symbol (`None` for `Symbol()`).
    symbols: Vec<Option<String>>,
}

impl ObjectHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an empty object whose `[[Prototype]]` is `proto`.
    pub fn alloc(&mut self, proto: Option<ObjectHandle>) -> ObjectHandle {
        self.alloc_object(OrdinaryObject::with_prototype(proto))
    }

    /// Allocate a new ordinary object with no prototype.
    pub fn alloc_plain(&mut self) -> ObjectHandle {
        self.alloc(None)
    }

    /// Move a fully built object onto the heap.
    pub fn alloc_object(&mut self, object: OrdinaryObject) -> ObjectHandle {
        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(object);
        handle
    }

    /// Allocate a new unique symbol.
    pub fn alloc_symbol(&mut self, description: Option<&str>) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32 + 1);
        self.symbols.push(description.map(str::to_string));
        id
    }

    pub fn symbol_description(&self, id: SymbolId) -> Option<&str> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.symbols.get(idx).and_then(|d| d.as_deref())
    }

    pub fn get(&self, handle: ObjectHandle) -> Result<&OrdinaryObject, ObjectError> {
        self.objects
            .get(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound(handle))
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Result<&mut OrdinaryObject, ObjectError> {
        self.objects
            .get_mut(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound(handle))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn class(&self, handle: ObjectHandle) -> Result<&ObjectClass, ObjectError> {
        Ok(&self.get(handle)?.class)
    }

    pub fn is_callable(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.class.is_callable())
    }

    // -- Prototype-chain lookups ---------------------------------------------

    /// Find `key` on `handle` or its prototype chain.
    ///
    /// Returns the object that owns the property together with a copy of
    /// its descriptor. Accessors are *not* invoked here.
    pub fn lookup_property(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<Option<(ObjectHandle, PropertyDescriptor)>, ObjectError> {
        let mut current = Some(handle);
        let mut depth: u32 = 0;
        let mut visited = BTreeSet::new();

        while let Some(h) = current {
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(ObjectError::PrototypeChainTooDeep {
                    depth,
                    max: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            if !visited.insert(h) {
                return Err(ObjectError::PrototypeCycleDetected);
            }

            let obj = self.get(h)?;
            if let Some(desc) = obj.get_own_property(key) {
                return Ok(Some((h, desc.clone())));
            }
            current = obj.prototype;
            depth += 1;
        }
        Ok(None)
    }

    /// `[[HasProperty]](O, P)`, walking the prototype chain.
    pub fn has_property(&self, handle: ObjectHandle, key: &PropertyKey) -> Result<bool, ObjectError> {
        Ok(self.lookup_property(handle, key)?.is_some())
    }

    pub fn has_own_property(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.has_own_property(key))
    }

    /// Own data write used by `[[Set]]` once no inherited property vetoes it:
    /// updates a writable own data property, or adds a new default data
    /// property when the object is extensible.
    pub fn set_own_property(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        value: JsValue,
    ) -> Result<bool, ObjectError> {
        let obj = self.get_mut(handle)?;
        if let Some(desc) = obj.properties.get_mut(&key) {
            return match desc {
                PropertyDescriptor::Data {
                    value: v,
                    writable: true,
                    ..
                } => {
                    *v = value;
                    Ok(true)
                }
                _ => Ok(false),
            };
        }
        if !obj.extensible {
            return Ok(false);
        }
        obj.properties.insert(key, PropertyDescriptor::data(value));
        Ok(true)
    }

    pub fn get_prototype_of(
        &self,
        handle: ObjectHandle,
    ) -> Result<Option<ObjectHandle>, ObjectError> {
        Ok(self.get(handle)?.prototype)
    }

    /// `[[SetPrototypeOf]](V)` (§9.1.2).
    ///
    /// Returns `Ok(false)` when a non-extensible object would change its
    /// prototype; cycles are reported as errors.
    pub fn set_prototype_of(
        &mut self,
        handle: ObjectHandle,
        proto: Option<ObjectHandle>,
    ) -> Result<bool, ObjectError> {
        if let Some(p) = proto {
            let mut current = Some(p);
            let mut visited = BTreeSet::new();
            visited.insert(handle);
            while let Some(h) = current {
                if !visited.insert(h) {
                    return Err(ObjectError::PrototypeCycleDetected);
                }
                current = self.get(h)?.prototype;
            }
        }

        let obj = self.get_mut(handle)?;
        if !obj.extensible {
            return Ok(obj.prototype == proto);
        }
        obj.prototype = proto;
        Ok(true)
    }

    pub fn is_extensible(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.extensible)
    }

    pub fn prevent_extensions(&mut self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        self.get_mut(handle)?.prevent_extensions();
        Ok(true)
    }

    pub fn define_property(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool, ObjectError> {
        self.get_mut(handle)?.define_own_property(key, desc)
    }

    pub fn get_own_property_descriptor(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<Option<PropertyDescriptor>, ObjectError> {
        Ok(self.get(handle)?.get_own_property(key).cloned())
    }

    pub fn own_property_keys(&self, handle: ObjectHandle) -> Result<Vec<PropertyKey>, ObjectError> {
        Ok(self.get(handle)?.own_property_keys())
    }

    /// Enumerable own string keys (`Object.keys` order).
    pub fn enumerable_own_string_keys(
        &self,
        handle: ObjectHandle,
    ) -> Result<Vec<String>, ObjectError> {
        let obj = self.get(handle)?;
        Ok(obj
            .own_property_keys()
            .into_iter()
            .filter(|k| obj.properties.get(k).is_some_and(PropertyDescriptor::is_enumerable))
            .filter_map(|k| match k {
                PropertyKey::String(s) => Some(s),
                PropertyKey::Symbol(_) => None,
            })
            .collect())
    }

    /// All own string keys, enumerable or not (`Object.getOwnPropertyNames`).
    pub fn own_property_names(&self, handle: ObjectHandle) -> Result<Vec<String>, ObjectError> {
        Ok(self
            .own_property_keys(handle)?
            .into_iter()
            .filter_map(|k| match k {
                PropertyKey::String(s) => Some(s),
                PropertyKey::Symbol(_) => None,
            })
            .collect())
    }

    pub fn freeze(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle)?.freeze();
        Ok(())
    }

    pub fn seal(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle)?.seal();
        Ok(())
    }

    pub fn is_frozen(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.is_frozen())
    }

    pub fn is_sealed(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.is_sealed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_key(s: &str) -> PropertyKey {
        PropertyKey::String(s.to_string())
    }

    fn num(n: f64) -> JsValue {
        JsValue::Number(n)
    }

    #[test]
    fn property_key_array_index_is_canonical() {
        assert_eq!(str_key("0").array_index(), Some(0));
        assert_eq!(str_key("42").array_index(), Some(42));
        assert_eq!(str_key("4294967294").array_index(), Some(4_294_967_294));
        assert_eq!(str_key("4294967295").array_index(), None);
        assert_eq!(str_key("01").array_index(), None);
        assert_eq!(str_key("+1").array_index(), None);
        assert_eq!(str_key("-0").array_index(), None);
        assert_eq!(PropertyKey::Symbol(SymbolId(1)).array_index(), None);
    }

    #[test]
    fn property_key_display() {
        assert_eq!(str_key("foo").to_string(), "foo");
        assert_eq!(PropertyKey::Symbol(SymbolId(3)).to_string(), "Symbol(3)");
        assert_eq!(PropertyKey::index(7), str_key("7"));
    }

    #[test]
    fn same_value_distinguishes_zeros_and_equates_nan() {
        assert!(num(f64::NAN).same_value(&num(f64::NAN)));
        assert!(!num(0.0).same_value(&num(-0.0)));
        assert!(num(-0.0).same_value(&num(-0.0)));
        assert!(num(5.0).same_value(&num(5.0)));
        assert!(JsValue::Null.same_value(&JsValue::Null));
        assert!(!JsValue::Null.same_value(&JsValue::Undefined));
    }

    #[test]
    fn strict_equals_follows_ieee() {
        assert!(!num(f64::NAN).strict_equals(&num(f64::NAN)));
        assert!(num(0.0).strict_equals(&num(-0.0)));
        assert!(JsValue::str("a").strict_equals(&JsValue::str("a")));
        assert!(!JsValue::Object(ObjectHandle(1)).strict_equals(&JsValue::Object(ObjectHandle(2))));
    }

    #[test]
    fn number_to_string_matches_js() {
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-3.0), "-3");
        assert_eq!(number_to_string(0.5), "0.5");
    }

    #[test]
    fn property_map_keeps_insertion_order_on_redefine() {
        let mut map = PropertyMap::new();
        map.insert(str_key("b"), PropertyDescriptor::data(num(1.0)));
        map.insert(str_key("a"), PropertyDescriptor::data(num(2.0)));
        let previous = map.insert(str_key("b"), PropertyDescriptor::data(num(3.0)));
        assert_eq!(previous, Some(PropertyDescriptor::data(num(1.0))));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![str_key("b"), str_key("a")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&str_key("b")), Some(&PropertyDescriptor::data(num(3.0))));
    }

    #[test]
    fn define_own_property_non_extensible_rejects() {
        let mut obj = OrdinaryObject::default();
        obj.prevent_extensions();
        let ok = obj
            .define_own_property(str_key("x"), PropertyDescriptor::data(num(1.0)))
            .expect("define");
        assert!(!ok);
    }

    #[test]
    fn define_own_property_non_configurable_rejects_reconfig() {
        let mut obj = OrdinaryObject::default();
        obj.define_own_property(str_key("x"), PropertyDescriptor::data_frozen(num(1.0)))
            .expect("define");
        let ok = obj
            .define_own_property(str_key("x"), PropertyDescriptor::data(num(2.0)))
            .expect("redefine");
        assert!(!ok);
        let same = obj
            .define_own_property(str_key("x"), PropertyDescriptor::data_frozen(num(1.0)))
            .expect("same");
        assert!(same);
    }

    #[test]
    fn non_configurable_accessor_cannot_change_getter() {
        let mut obj = OrdinaryObject::default();
        obj.define_own_property(
            str_key("g"),
            PropertyDescriptor::accessor(Some(ObjectHandle(1)), None, true),
        )
        .expect("define");
        let ok = obj
            .define_own_property(
                str_key("g"),
                PropertyDescriptor::accessor(Some(ObjectHandle(2)), None, true),
            )
            .expect("redefine");
        assert!(!ok);
    }

    #[test]
    fn own_property_keys_order() {
        let obj = OrdinaryObject::default()
            .with_property("b", PropertyDescriptor::data(num(1.0)))
            .with_property(PropertyKey::Symbol(SymbolId(9)), PropertyDescriptor::data(num(0.0)))
            .with_property("10", PropertyDescriptor::data(num(2.0)))
            .with_property("a", PropertyDescriptor::data(num(3.0)))
            .with_property("2", PropertyDescriptor::data(num(4.0)))
            .with_property(PropertyKey::Symbol(SymbolId(2)), PropertyDescriptor::data(num(0.0)));
        assert_eq!(
            obj.own_property_keys(),
            vec![
                str_key("2"),
                str_key("10"),
                str_key("b"),
                str_key("a"),
                PropertyKey::Symbol(SymbolId(9)),
                PropertyKey::Symbol(SymbolId(2)),
            ]
        );
    }

    #[test]
    fn freeze_and_seal_predicates() {
        let mut frozen = OrdinaryObject::default().with_property("a", PropertyDescriptor::data(num(1.0)));
        frozen.freeze();
        assert!(frozen.is_frozen());
        assert!(frozen.is_sealed());

        let mut sealed = OrdinaryObject::default().with_property("a", PropertyDescriptor::data(num(1.0)));
        sealed.seal();
        assert!(sealed.is_sealed());
        assert!(!sealed.is_frozen());
        assert!(sealed.get_own_property(&str_key("a")).expect("a").is_writable());

        let mut empty = OrdinaryObject::default();
        assert!(!empty.is_sealed());
        empty.prevent_extensions();
        assert!(empty.is_sealed());
        assert!(empty.is_frozen());
    }

    #[test]
    fn heap_get_invalid_handle() {
        let heap = ObjectHeap::new();
        assert_eq!(
            heap.get(ObjectHandle(3)).unwrap_err(),
            ObjectError::ObjectNotFound(ObjectHandle(3))
        );
    }

    #[test]
    fn heap_lookup_walks_prototype_chain() {
        let mut heap = ObjectHeap::new();
        let proto = heap.alloc_plain();
        heap.define_property(proto, str_key("inherited"), PropertyDescriptor::data(num(1.0)))
            .expect("define");
        let child = heap.alloc(Some(proto));
        let (owner, desc) = heap
            .lookup_property(child, &str_key("inherited"))
            .expect("lookup")
            .expect("found");
        assert_eq!(owner, proto);
        assert_eq!(desc.value(), Some(&num(1.0)));
        assert!(heap.has_property(child, &str_key("inherited")).expect("has"));
        assert!(!heap.has_own_property(child, &str_key("inherited")).expect("own"));
        assert!(heap.lookup_property(child, &str_key("missing")).expect("lookup").is_none());
    }

    #[test]
    fn set_prototype_cycle_detection() {
        let mut heap = ObjectHeap::new();
        let a = heap.alloc_plain();
        let b = heap.alloc(Some(a));
        assert_eq!(
            heap.set_prototype_of(a, Some(b)),
            Err(ObjectError::PrototypeCycleDetected)
        );
        assert_eq!(heap.set_prototype_of(a, Some(a)), Err(ObjectError::PrototypeCycleDetected));
    }

    #[test]
    fn set_prototype_non_extensible_only_allows_same() {
        let mut heap = ObjectHeap::new();
        let proto = heap.alloc_plain();
        let obj = heap.alloc(Some(proto));
        heap.prevent_extensions(obj).expect("prevent");
        assert!(heap.set_prototype_of(obj, Some(proto)).expect("same"));
        assert!(!heap.set_prototype_of(obj, None).expect("different"));
        assert_eq!(heap.get_prototype_of(obj).expect("proto"), Some(proto));
    }

    #[test]
    fn set_own_property_rules() {
        let mut heap = ObjectHeap::new();
        let obj = heap.alloc_plain();
        assert!(heap.set_own_property(obj, str_key("a"), num(1.0)).expect("add"));
        assert!(heap.set_own_property(obj, str_key("a"), num(2.0)).expect("update"));
        heap.define_property(obj, str_key("ro"), PropertyDescriptor::data_frozen(num(0.0)))
            .expect("define");
        assert!(!heap.set_own_property(obj, str_key("ro"), num(5.0)).expect("ro"));
        heap.prevent_extensions(obj).expect("prevent");
        assert!(!heap.set_own_property(obj, str_key("b"), num(3.0)).expect("new"));
        assert!(heap.set_own_property(obj, str_key("a"), num(4.0)).expect("existing"));
    }

    #[test]
    fn enumerable_own_string_keys_skip_hidden_and_symbols() {
        let mut heap = ObjectHeap::new();
        let obj = heap.alloc_object(
            OrdinaryObject::default()
                .with_property("visible", PropertyDescriptor::data(num(1.0)))
                .with_property("hidden", PropertyDescriptor::data_hidden(num(2.0)))
                .with_property(PropertyKey::Symbol(SymbolId(1)), PropertyDescriptor::data(num(3.0))),
        );
        assert_eq!(
            heap.enumerable_own_string_keys(obj).expect("keys"),
            vec!["visible".to_string()]
        );
        assert_eq!(
            heap.own_property_names(obj).expect("names"),
            vec!["visible".to_string(), "hidden".to_string()]
        );
    }

    #[test]
    fn symbol_allocation_and_descriptions() {
        let mut heap = ObjectHeap::new();
        let a = heap.alloc_symbol(Some("a"));
        let b = heap.alloc_symbol(None);
        assert_ne!(a, b);
        assert_eq!(heap.symbol_description(a), Some("a"));
        assert_eq!(heap.symbol_description(b), None);
        assert_eq!(heap.symbol_description(SymbolId(0)), None);
    }

    #[test]
    fn object_error_display_and_class() {
        assert_eq!(ObjectError::type_error("bad").to_string(), "TypeError: bad");
        assert!(ObjectError::PrototypeCycleDetected.is_type_error());
        assert!(!ObjectError::ObjectNotFound(ObjectHandle(1)).is_type_error());
        assert_eq!(
            ObjectError::PrototypeChainTooDeep { depth: 2000, max: 1024 }.to_string(),
            "TypeError: prototype chain depth 2000 exceeds max 1024"
        );
    }

    #[test]
    fn ordinary_object_serde_roundtrip() {
        let obj = OrdinaryObject::with_class(Some(ObjectHandle(2)), ObjectClass::StringWrapper("ab".into()))
            .with_property("0", PropertyDescriptor::data(JsValue::str("a")))
            .with_property("length", PropertyDescriptor::data_frozen(num(2.0)));
        let json = serde_json::to_string(&obj).expect("serialize");
        let back: OrdinaryObject = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, obj);
    }
}
