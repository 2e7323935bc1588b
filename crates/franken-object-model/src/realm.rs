//! Realm: intrinsics, host configuration and the value-level operations
//! (`ToObject`, `[[Get]]`, `[[Set]]`, calls) that need more than the heap.
//!
//! A realm is cheap to build, and the conformance runner builds a fresh one
//! for every case so no case can observe another case's mutations.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::object_builtins::{self, ObjectOperation, SemanticsProfile};
use crate::object_model::{
    FunctionKind, JsValue, ObjectClass, ObjectError, ObjectHandle, ObjectHeap, OrdinaryObject,
    PropertyDescriptor, PropertyKey, SymbolId, number_to_string,
};

// ---------------------------------------------------------------------------
// RealmConfig: what kind of host the realm emulates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConfig {
    pub profile: SemanticsProfile,
    /// `Symbol()` is available.
    pub symbols: bool,
    /// Function objects carry a `name` property.
    pub function_names: bool,
    /// Operations left off the `Object` namespace even if the profile has them.
    pub omitted_operations: BTreeSet<ObjectOperation>,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self::es2015()
    }
}

impl RealmConfig {
    pub fn es2015() -> Self {
        Self {
            profile: SemanticsProfile::Es2015,
            symbols: true,
            function_names: true,
            omitted_operations: BTreeSet::new(),
        }
    }

    pub fn es5() -> Self {
        Self {
            profile: SemanticsProfile::Es5,
            symbols: false,
            function_names: true,
            omitted_operations: BTreeSet::new(),
        }
    }

    pub fn without(mut self, op: ObjectOperation) -> Self {
        self.omitted_operations.insert(op);
        self
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        serde_json::from_slice(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Is `op` installed on the `Object` namespace of realms built from this
    /// config?
    pub fn installs(&self, op: ObjectOperation) -> bool {
        op.introduced_in() <= self.profile && !self.omitted_operations.contains(&op)
    }

    /// Stable identifier used in run ids and fingerprints.
    pub fn host_id(&self) -> String {
        let mut id = self.profile.as_str().to_string();
        if !self.symbols {
            id.push_str("-nosymbols");
        }
        if !self.function_names {
            id.push_str("-nofnnames");
        }
        for op in &self.omitted_operations {
            id.push_str("-no");
            id.push_str(op.method_name());
        }
        id
    }
}

/// A host environment the conformance checker can run against.
pub trait HostEnvironment {
    fn host_id(&self) -> String;
    fn fresh_realm(&self) -> Realm;
}

impl HostEnvironment for RealmConfig {
    fn host_id(&self) -> String {
        RealmConfig::host_id(self)
    }

    fn fresh_realm(&self) -> Realm {
        Realm::new(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Intrinsics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub object_prototype: ObjectHandle,
    pub function_prototype: ObjectHandle,
    pub array_prototype: ObjectHandle,
    pub boolean_prototype: ObjectHandle,
    pub number_prototype: ObjectHandle,
    pub string_prototype: ObjectHandle,
    pub symbol_prototype: Option<ObjectHandle>,
    pub regexp_prototype: ObjectHandle,
    /// The `Object` constructor, which doubles as the namespace of static
    /// operations.
    pub object_constructor: ObjectHandle,
    pub global_object: ObjectHandle,
}

// ---------------------------------------------------------------------------
// Realm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Realm {
    heap: ObjectHeap,
    intrinsics: Intrinsics,
    config: RealmConfig,
    /// Tags appended by recording accessors, in call order.
    journal: Vec<JsValue>,
}

fn function_object(
    proto: ObjectHandle,
    name: &str,
    length: u32,
    kind: FunctionKind,
    with_name: bool,
) -> OrdinaryObject {
    let mut obj = OrdinaryObject::with_class(Some(proto), ObjectClass::Function(kind));
    obj.properties.insert(
        "length".into(),
        PropertyDescriptor::Data {
            value: JsValue::Number(f64::from(length)),
            writable: false,
            enumerable: false,
            configurable: true,
        },
    );
    if with_name {
        obj.properties.insert(
            "name".into(),
            PropertyDescriptor::Data {
                value: JsValue::str(name),
                writable: false,
                enumerable: false,
                configurable: true,
            },
        );
    }
    obj
}

impl Realm {
    pub fn new(config: RealmConfig) -> Self {
        let mut heap = ObjectHeap::new();
        let object_prototype = heap.alloc_plain();
        let function_prototype = heap.alloc(Some(object_prototype));
        let array_prototype = heap.alloc(Some(object_prototype));
        let boolean_prototype = heap.alloc(Some(object_prototype));
        let number_prototype = heap.alloc(Some(object_prototype));
        let string_prototype = heap.alloc(Some(object_prototype));
        let symbol_prototype = config.symbols.then(|| heap.alloc(Some(object_prototype)));
        let regexp_prototype = heap.alloc(Some(object_prototype));

        let mut constructor = function_object(
            function_prototype,
            "Object",
            1,
            FunctionKind::ObjectConstructor,
            config.function_names,
        );
        constructor.properties.insert(
            "prototype".into(),
            PropertyDescriptor::data_frozen(JsValue::Object(object_prototype)),
        );
        for op in ObjectOperation::ALL {
            if !config.installs(op) {
                continue;
            }
            let method = heap.alloc_object(function_object(
                function_prototype,
                op.method_name(),
                op.arity(),
                FunctionKind::ObjectStatic(op),
                config.function_names,
            ));
            constructor.properties.insert(
                op.method_name().into(),
                PropertyDescriptor::data_hidden(JsValue::Object(method)),
            );
        }
        let object_constructor = heap.alloc_object(constructor);
        if let Ok(proto) = heap.get_mut(object_prototype) {
            proto.properties.insert(
                "constructor".into(),
                PropertyDescriptor::data_hidden(JsValue::Object(object_constructor)),
            );
        }

        let global_object = heap.alloc_object(
            OrdinaryObject::with_prototype(Some(object_prototype)).with_property(
                "Object",
                PropertyDescriptor::data_hidden(JsValue::Object(object_constructor)),
            ),
        );

        Self {
            heap,
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
                array_prototype,
                boolean_prototype,
                number_prototype,
                string_prototype,
                symbol_prototype,
                regexp_prototype,
                object_constructor,
                global_object,
            },
            config,
            journal: Vec::new(),
        }
    }

    pub fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut ObjectHeap {
        &mut self.heap
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    pub fn profile(&self) -> SemanticsProfile {
        self.config.profile
    }

    /// The `Object` namespace under test.
    pub fn object_namespace(&self) -> ObjectHandle {
        self.intrinsics.object_constructor
    }

    pub fn journal(&self) -> &[JsValue] {
        &self.journal
    }

    // -- Object creation ------------------------------------------------------

    /// `{}`
    pub fn create_object(&mut self) -> ObjectHandle {
        self.heap.alloc(Some(self.intrinsics.object_prototype))
    }

    /// Object literal with data properties in the given order.
    pub fn create_object_from(&mut self, entries: &[(&str, JsValue)]) -> ObjectHandle {
        let mut obj = OrdinaryObject::with_prototype(Some(self.intrinsics.object_prototype));
        for (key, value) in entries {
            obj.properties
                .insert((*key).into(), PropertyDescriptor::data(value.clone()));
        }
        self.heap.alloc_object(obj)
    }

    /// Array literal.
    pub fn create_array(&mut self, values: &[JsValue]) -> ObjectHandle {
        let mut obj =
            OrdinaryObject::with_class(Some(self.intrinsics.array_prototype), ObjectClass::Array);
        for (idx, value) in values.iter().enumerate() {
            obj.properties
                .insert(PropertyKey::index(idx as u32), PropertyDescriptor::data(value.clone()));
        }
        obj.properties.insert(
            "length".into(),
            PropertyDescriptor::Data {
                value: JsValue::Number(values.len() as f64),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        self.heap.alloc_object(obj)
    }

    /// Array of strings, the shape every key-listing operation returns.
    pub fn create_string_array(&mut self, values: &[String]) -> ObjectHandle {
        let values: Vec<JsValue> = values.iter().map(|s| JsValue::Str(s.clone())).collect();
        self.create_array(&values)
    }

    /// RegExp literal such as `/a/g`.
    pub fn create_regexp(&mut self, source: &str, flags: &str) -> ObjectHandle {
        let obj = OrdinaryObject::with_class(
            Some(self.intrinsics.regexp_prototype),
            ObjectClass::RegExp {
                source: source.to_string(),
                flags: flags.to_string(),
            },
        )
        .with_property(
            "lastIndex",
            PropertyDescriptor::Data {
                value: JsValue::Number(0.0),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        self.heap.alloc_object(obj)
    }

    /// A function object with the given behavior.
    pub fn create_function(&mut self, name: &str, length: u32, kind: FunctionKind) -> ObjectHandle {
        self.heap.alloc_object(function_object(
            self.intrinsics.function_prototype,
            name,
            length,
            kind,
            self.config.function_names,
        ))
    }

    /// `function Name() {}` together with its `prototype` object.
    pub fn create_constructor(&mut self, name: &str) -> Result<ObjectHandle, ObjectError> {
        let ctor = self.create_function(name, 0, FunctionKind::Plain);
        let proto = self.heap.alloc_object(
            OrdinaryObject::with_prototype(Some(self.intrinsics.object_prototype)).with_property(
                "constructor",
                PropertyDescriptor::data_hidden(JsValue::Object(ctor)),
            ),
        );
        self.heap.define_property(
            ctor,
            "prototype".into(),
            PropertyDescriptor::Data {
                value: JsValue::Object(proto),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        )?;
        Ok(ctor)
    }

    /// `new Ctor()` for a constructor whose body does nothing.
    pub fn construct(&mut self, ctor: ObjectHandle) -> Result<ObjectHandle, ObjectError> {
        if !self.heap.is_callable(ctor)? {
            return Err(ObjectError::type_error(format!(
                "{} is not a constructor",
                self.inspect(&JsValue::Object(ctor))
            )));
        }
        let proto = match self.get(ctor, &"prototype".into())? {
            JsValue::Object(p) => p,
            _ => self.intrinsics.object_prototype,
        };
        Ok(self.heap.alloc(Some(proto)))
    }

    /// Getter that journals `tag` and returns `returns`.
    pub fn create_recording_getter(&mut self, tag: JsValue, returns: JsValue) -> ObjectHandle {
        self.create_function("get", 0, FunctionKind::RecordingGetter { tag, returns })
    }

    /// Setter that journals `tag`.
    pub fn create_recording_setter(&mut self, tag: JsValue) -> ObjectHandle {
        self.create_function("set", 1, FunctionKind::RecordingSetter { tag })
    }

    /// `Symbol(description)`.
    pub fn new_symbol(&mut self, description: &str) -> Result<SymbolId, ObjectError> {
        if !self.config.symbols {
            return Err(ObjectError::type_error("Symbol is not supported by this host"));
        }
        Ok(self.heap.alloc_symbol(Some(description)))
    }

    // -- Abstract operations --------------------------------------------------

    /// `ToObject(value)` (ES2015 §7.1.13).
    pub fn to_object(&mut self, value: &JsValue) -> Result<ObjectHandle, ObjectError> {
        let obj = match value {
            JsValue::Undefined | JsValue::Null => {
                return Err(ObjectError::type_error(format!(
                    "cannot convert {value} to object"
                )));
            }
            JsValue::Object(h) => return Ok(*h),
            JsValue::Bool(b) => OrdinaryObject::with_class(
                Some(self.intrinsics.boolean_prototype),
                ObjectClass::BooleanWrapper(*b),
            ),
            JsValue::Number(n) => OrdinaryObject::with_class(
                Some(self.intrinsics.number_prototype),
                ObjectClass::NumberWrapper(*n),
            ),
            JsValue::Str(s) => self.string_wrapper(s),
            JsValue::Symbol(id) => {
                let proto = self
                    .intrinsics
                    .symbol_prototype
                    .unwrap_or(self.intrinsics.object_prototype);
                OrdinaryObject::with_class(Some(proto), ObjectClass::SymbolWrapper(*id))
            }
        };
        Ok(self.heap.alloc_object(obj))
    }

    /// String exotic object: one read-only enumerable index property per
    /// UTF-16 code unit plus a hidden `length`.
    ///
    /// `JsValue::Str` cannot hold a lone surrogate, so each half of a
    /// surrogate pair reads back as U+FFFD. Indices and `length` still count
    /// code units.
    fn string_wrapper(&self, s: &str) -> OrdinaryObject {
        let mut obj = OrdinaryObject::with_class(
            Some(self.intrinsics.string_prototype),
            ObjectClass::StringWrapper(s.to_string()),
        );
        let units: Vec<u16> = s.encode_utf16().collect();
        for (idx, unit) in units.iter().enumerate() {
            obj.properties.insert(
                PropertyKey::index(idx as u32),
                PropertyDescriptor::Data {
                    value: JsValue::Str(String::from_utf16_lossy(&[*unit])),
                    writable: false,
                    enumerable: true,
                    configurable: false,
                },
            );
        }
        obj.properties.insert(
            "length".into(),
            PropertyDescriptor::data_frozen(JsValue::Number(units.len() as f64)),
        );
        obj
    }

    /// `ToPropertyKey(value)` for primitive inputs.
    pub fn to_property_key(&self, value: &JsValue) -> Result<PropertyKey, ObjectError> {
        match value {
            JsValue::Symbol(id) => Ok(PropertyKey::Symbol(*id)),
            JsValue::Str(s) => Ok(PropertyKey::String(s.clone())),
            JsValue::Number(n) => Ok(PropertyKey::String(number_to_string(*n))),
            JsValue::Bool(b) => Ok(PropertyKey::String(b.to_string())),
            JsValue::Undefined => Ok("undefined".into()),
            JsValue::Null => Ok("null".into()),
            JsValue::Object(_) => Err(ObjectError::type_error(
                "cannot convert object to a property key without ToPrimitive",
            )),
        }
    }

    /// `[[Get]](P, Receiver)` with the object itself as receiver.
    pub fn get(&mut self, handle: ObjectHandle, key: &PropertyKey) -> Result<JsValue, ObjectError> {
        match self.heap.lookup_property(handle, key)? {
            None => Ok(JsValue::Undefined),
            Some((_, PropertyDescriptor::Data { value, .. })) => Ok(value),
            Some((_, PropertyDescriptor::Accessor { get: None, .. })) => Ok(JsValue::Undefined),
            Some((
                _,
                PropertyDescriptor::Accessor {
                    get: Some(getter), ..
                },
            )) => self.call(getter, JsValue::Object(handle), &[]),
        }
    }

    /// `[[Set]](P, V, Receiver)` (ES2015 §9.1.9). With `throw` set, a
    /// rejected write raises a `TypeError` as strict-mode code would.
    pub fn set(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        value: JsValue,
        throw: bool,
    ) -> Result<bool, ObjectError> {
        let ok = match self.heap.lookup_property(handle, &key)? {
            Some((_, PropertyDescriptor::Data { writable: false, .. })) => false,
            Some((_, PropertyDescriptor::Accessor { set: None, .. })) => false,
            Some((
                _,
                PropertyDescriptor::Accessor {
                    set: Some(setter), ..
                },
            )) => {
                self.call(setter, JsValue::Object(handle), &[value])?;
                true
            }
            Some((_, PropertyDescriptor::Data { .. })) | None => {
                self.heap.set_own_property(handle, key.clone(), value)?
            }
        };
        if !ok && throw {
            return Err(ObjectError::type_error(format!(
                "cannot assign to property '{}' of {}",
                self.describe_key(&key),
                self.inspect(&JsValue::Object(handle))
            )));
        }
        Ok(ok)
    }

    /// `Object.defineProperty(O, P, Desc)` with a complete descriptor,
    /// throwing on rejection.
    pub fn define_property_or_throw(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<(), ObjectError> {
        if self.heap.define_property(handle, key.clone(), desc)? {
            Ok(())
        } else {
            Err(ObjectError::type_error(format!(
                "cannot define property '{}'",
                self.describe_key(&key)
            )))
        }
    }

    /// `Call(F, thisArg, args)`.
    pub fn call(
        &mut self,
        function: ObjectHandle,
        _this: JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, ObjectError> {
        let ObjectClass::Function(kind) = self.heap.class(function)?.clone() else {
            return Err(ObjectError::type_error(format!(
                "{} is not a function",
                self.inspect(&JsValue::Object(function))
            )));
        };
        match kind {
            FunctionKind::ObjectConstructor => match args.first() {
                None | Some(JsValue::Undefined) | Some(JsValue::Null) => {
                    Ok(JsValue::Object(self.create_object()))
                }
                Some(value) => Ok(JsValue::Object(self.to_object(value)?)),
            },
            FunctionKind::ObjectStatic(op) => object_builtins::invoke(self, op, args),
            FunctionKind::Plain => Ok(JsValue::Undefined),
            FunctionKind::RecordingGetter { tag, returns } => {
                self.journal.push(tag);
                Ok(returns)
            }
            FunctionKind::RecordingSetter { tag } => {
                self.journal.push(tag);
                Ok(JsValue::Undefined)
            }
        }
    }

    /// `Object.<name>(...args)` looked up on the namespace at call time, so
    /// a missing operation fails the way a script call would.
    pub fn call_object_method(
        &mut self,
        name: &str,
        args: &[JsValue],
    ) -> Result<JsValue, ObjectError> {
        let namespace = self.object_namespace();
        match self.get(namespace, &name.into())? {
            JsValue::Object(method) if self.heap.is_callable(method)? => {
                self.call(method, JsValue::Object(namespace), args)
            }
            _ => Err(ObjectError::type_error(format!("Object.{name} is not a function"))),
        }
    }

    /// `Object(value)`.
    pub fn box_value(&mut self, value: &JsValue) -> Result<JsValue, ObjectError> {
        let namespace = self.object_namespace();
        self.call(namespace, JsValue::Undefined, std::slice::from_ref(value))
    }

    /// Read `length` and the index properties of an array-like object.
    pub fn array_values(&mut self, handle: ObjectHandle) -> Result<Vec<JsValue>, ObjectError> {
        let length = match self.get(handle, &"length".into())? {
            JsValue::Number(n) if n.is_finite() && n >= 0.0 => n as u32,
            _ => 0,
        };
        (0..length)
            .map(|idx| self.get(handle, &PropertyKey::index(idx)))
            .collect()
    }

    // -- Deep equality ----------------------------------------------------------

    /// Deep equality in the style of chai's `eql`.
    ///
    /// Primitives compare with `SameValue`, so `NaN` equals `NaN` and `0`
    /// differs from `-0`.
    /// Objects compare by reference, or by class, wrapped primitive and their
    /// sorted own enumerable keys with recursively equal values.
    pub fn deep_equal(&mut self, a: &JsValue, b: &JsValue) -> Result<bool, ObjectError> {
        let mut in_progress = BTreeSet::new();
        self.deep_equal_inner(a, b, &mut in_progress)
    }

    fn deep_equal_inner(
        &mut self,
        a: &JsValue,
        b: &JsValue,
        in_progress: &mut BTreeSet<(ObjectHandle, ObjectHandle)>,
    ) -> Result<bool, ObjectError> {
        let (x, y) = match (a, b) {
            (JsValue::Object(x), JsValue::Object(y)) => (*x, *y),
            (JsValue::Object(_), _) | (_, JsValue::Object(_)) => return Ok(false),
            _ => return Ok(a.same_value(b)),
        };
        if x == y || !in_progress.insert((x, y)) {
            return Ok(true);
        }

        let class_x = self.heap.class(x)?.clone();
        let class_y = self.heap.class(y)?.clone();
        let same_class = match (&class_x, &class_y) {
            (ObjectClass::Function(_), ObjectClass::Function(_)) => false,
            _ => {
                class_x.tag() == class_y.tag()
                    && match (class_x.wrapped_primitive(), class_y.wrapped_primitive()) {
                        (Some(p), Some(q)) => p.same_value(&q),
                        (None, None) => class_x == class_y,
                        _ => false,
                    }
            }
        };
        if !same_class {
            return Ok(false);
        }

        let keys_x = self.sorted_enumerable_keys(x)?;
        let keys_y = self.sorted_enumerable_keys(y)?;
        if keys_x != keys_y {
            return Ok(false);
        }
        for key in &keys_x {
            let vx = self.get(x, key)?;
            let vy = self.get(y, key)?;
            if !self.deep_equal_inner(&vx, &vy, in_progress)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn sorted_enumerable_keys(&self, handle: ObjectHandle) -> Result<Vec<PropertyKey>, ObjectError> {
        let obj = self.heap.get(handle)?;
        let mut keys: Vec<PropertyKey> = obj
            .own_property_keys()
            .into_iter()
            .filter(|k| obj.properties.get(k).is_some_and(PropertyDescriptor::is_enumerable))
            .collect();
        keys.sort();
        Ok(keys)
    }

    // -- Inspection -------------------------------------------------------------

    pub fn describe_key(&self, key: &PropertyKey) -> String {
        match key {
            PropertyKey::String(s) => s.clone(),
            PropertyKey::Symbol(id) => self.describe_symbol(*id),
        }
    }

    fn describe_symbol(&self, id: SymbolId) -> String {
        format!("Symbol({})", self.heap.symbol_description(id).unwrap_or(""))
    }

    /// Render a value for assertion messages without running any accessor.
    pub fn inspect(&self, value: &JsValue) -> String {
        let mut seen = BTreeSet::new();
        self.inspect_inner(value, 0, &mut seen)
    }

    fn inspect_inner(
        &self,
        value: &JsValue,
        depth: usize,
        seen: &mut BTreeSet<ObjectHandle>,
    ) -> String {
        let handle = match value {
            JsValue::Str(s) => return format!("'{s}'"),
            JsValue::Number(n) if *n == 0.0 && n.is_sign_negative() => return "-0".to_string(),
            JsValue::Symbol(id) => return self.describe_symbol(*id),
            JsValue::Object(h) => *h,
            other => return other.to_string(),
        };
        let Ok(obj) = self.heap.get(handle) else {
            return format!("[dangling object#{}]", handle.0);
        };
        if let ObjectClass::Function(_) = obj.class {
            return match obj.get_own_property(&"name".into()).and_then(|d| d.value()) {
                Some(JsValue::Str(name)) if !name.is_empty() => format!("[Function: {name}]"),
                _ => "[Function (anonymous)]".to_string(),
            };
        }
        if depth > 2 || !seen.insert(handle) {
            return format!("[{}]", obj.class.tag());
        }

        let mut parts = Vec::new();
        for key in obj.own_property_keys() {
            let Some(desc) = obj.properties.get(&key) else {
                continue;
            };
            if !desc.is_enumerable() {
                continue;
            }
            let rendered = match desc {
                PropertyDescriptor::Data { value, .. } => self.inspect_inner(value, depth + 1, seen),
                PropertyDescriptor::Accessor { .. } => "[Getter/Setter]".to_string(),
            };
            if matches!(obj.class, ObjectClass::Array) && key.array_index().is_some() {
                parts.push(rendered);
            } else {
                let label = match &key {
                    PropertyKey::String(s) => s.clone(),
                    PropertyKey::Symbol(id) => format!("[{}]", self.describe_symbol(*id)),
                };
                parts.push(format!("{label}: {rendered}"));
            }
        }
        seen.remove(&handle);

        let body = if parts.is_empty() {
            String::new()
        } else {
            format!(" {} ", parts.join(", "))
        };
        match &obj.class {
            ObjectClass::Array => format!("[{body}]"),
            ObjectClass::Ordinary => format!("{{{body}}}"),
            ObjectClass::RegExp { source, flags } => format!("/{source}/{flags}"),
            class => {
                let inner = class
                    .wrapped_primitive()
                    .map(|p| self.inspect_inner(&p, depth + 1, seen))
                    .unwrap_or_default();
                format!("[{}: {inner}]", class.tag())
            }
        }
    }
}
