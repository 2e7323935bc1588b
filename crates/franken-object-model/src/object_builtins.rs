//! The `Object` static operations exercised by the conformance suite.
//!
//! Each operation is dispatched through [`invoke`] when a realm calls the
//! corresponding function object on its `Object` namespace. Argument handling
//! depends on the realm's [`SemanticsProfile`]: ES5 hosts reject non-object
//! arguments where ES2015 coerces them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::object_model::{JsValue, ObjectError, ObjectHandle, PropertyDescriptor};
use crate::realm::Realm;

// ---------------------------------------------------------------------------
// SemanticsProfile
// ---------------------------------------------------------------------------

/// Which edition's argument semantics a host implements.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SemanticsProfile {
    Es5,
    #[default]
    Es2015,
}

impl SemanticsProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es5 => "es5",
            Self::Es2015 => "es2015",
        }
    }

    /// Primitive arguments are coerced with `ToObject` (or passed through)
    /// instead of being rejected.
    pub fn coerces_primitives(self) -> bool {
        self >= Self::Es2015
    }
}

impl fmt::Display for SemanticsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticsProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es5" => Ok(Self::Es5),
            "es2015" | "es6" => Ok(Self::Es2015),
            other => Err(format!("unknown semantics profile `{other}`")),
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectOperation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectOperation {
    Is,
    Assign,
    GetOwnPropertyNames,
    GetOwnPropertyDescriptor,
    Seal,
    IsSealed,
    Freeze,
    IsFrozen,
    PreventExtensions,
    IsExtensible,
    Keys,
    GetPrototypeOf,
    SetPrototypeOf,
}

impl ObjectOperation {
    pub const ALL: [Self; 13] = [
        Self::Is,
        Self::Assign,
        Self::GetOwnPropertyNames,
        Self::GetOwnPropertyDescriptor,
        Self::Seal,
        Self::IsSealed,
        Self::Freeze,
        Self::IsFrozen,
        Self::PreventExtensions,
        Self::IsExtensible,
        Self::Keys,
        Self::GetPrototypeOf,
        Self::SetPrototypeOf,
    ];

    /// Property name on the `Object` namespace.
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::Assign => "assign",
            Self::GetOwnPropertyNames => "getOwnPropertyNames",
            Self::GetOwnPropertyDescriptor => "getOwnPropertyDescriptor",
            Self::Seal => "seal",
            Self::IsSealed => "isSealed",
            Self::Freeze => "freeze",
            Self::IsFrozen => "isFrozen",
            Self::PreventExtensions => "preventExtensions",
            Self::IsExtensible => "isExtensible",
            Self::Keys => "keys",
            Self::GetPrototypeOf => "getPrototypeOf",
            Self::SetPrototypeOf => "setPrototypeOf",
        }
    }

    /// Value of the function's `length` property.
    pub fn arity(self) -> u32 {
        match self {
            Self::Is | Self::Assign | Self::GetOwnPropertyDescriptor | Self::SetPrototypeOf => 2,
            _ => 1,
        }
    }

    /// First edition whose hosts install this operation.
    pub fn introduced_in(self) -> SemanticsProfile {
        match self {
            Self::Is | Self::Assign | Self::SetPrototypeOf => SemanticsProfile::Es2015,
            _ => SemanticsProfile::Es5,
        }
    }
}

impl fmt::Display for ObjectOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for ObjectOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.method_name() == s)
            .ok_or_else(|| format!("unknown Object operation `{s}`"))
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run `op` with the given arguments. Missing arguments are `undefined`.
pub fn invoke(
    realm: &mut Realm,
    op: ObjectOperation,
    args: &[JsValue],
) -> Result<JsValue, ObjectError> {
    let arg = |idx: usize| args.get(idx).cloned().unwrap_or(JsValue::Undefined);
    match op {
        ObjectOperation::Is => Ok(JsValue::Bool(arg(0).same_value(&arg(1)))),
        ObjectOperation::Assign => assign(realm, &arg(0), args.get(1..).unwrap_or_default()),
        ObjectOperation::GetOwnPropertyNames => get_own_property_names(realm, &arg(0)),
        ObjectOperation::GetOwnPropertyDescriptor => {
            get_own_property_descriptor(realm, &arg(0), &arg(1))
        }
        ObjectOperation::Seal => set_integrity_level(realm, op, arg(0)),
        ObjectOperation::Freeze => set_integrity_level(realm, op, arg(0)),
        ObjectOperation::PreventExtensions => set_integrity_level(realm, op, arg(0)),
        ObjectOperation::IsSealed | ObjectOperation::IsFrozen | ObjectOperation::IsExtensible => {
            test_integrity_level(realm, op, &arg(0))
        }
        ObjectOperation::Keys => keys(realm, &arg(0)),
        ObjectOperation::GetPrototypeOf => get_prototype_of(realm, &arg(0)),
        ObjectOperation::SetPrototypeOf => set_prototype_of(realm, arg(0), &arg(1)),
    }
}

/// Object argument for the introspection operations: ES2015 boxes
/// primitives, ES5 rejects anything that is not already an object.
fn object_argument(
    realm: &mut Realm,
    op: ObjectOperation,
    value: &JsValue,
) -> Result<ObjectHandle, ObjectError> {
    if let JsValue::Object(handle) = value {
        return Ok(*handle);
    }
    if !realm.profile().coerces_primitives() {
        return Err(ObjectError::type_error(format!(
            "Object.{op} called on non-object {}",
            realm.inspect(value)
        )));
    }
    realm.to_object(value)
}

/// ### Object.assign ( target, ...sources ) (ES2015 §19.1.2.1)
///
/// Writes are committed one at a time with a throwing `[[Set]]`, so a failed
/// write leaves every earlier write in place and attempts no later one.
fn assign(realm: &mut Realm, target: &JsValue, sources: &[JsValue]) -> Result<JsValue, ObjectError> {
    // 1. Let to be ? ToObject(target).
    let to = realm.to_object(target)?;
    // 3. For each element nextSource of sources, do
    for next_source in sources {
        // a. If nextSource is neither undefined nor null, then
        if next_source.is_nullish() {
            continue;
        }
        // i. Let from be ! ToObject(nextSource).
        let from = realm.to_object(next_source)?;
        // ii. Let keys be ? from.[[OwnPropertyKeys]]().
        let keys = realm.heap().own_property_keys(from)?;
        // iii. For each element nextKey of keys, do
        for next_key in keys {
            // 1. Let desc be ? from.[[GetOwnProperty]](nextKey).
            let Some(desc) = realm.heap().get_own_property_descriptor(from, &next_key)? else {
                continue;
            };
            // 2. If desc is not undefined and desc.[[Enumerable]] is true, then
            if !desc.is_enumerable() {
                continue;
            }
            // a. Let propValue be ? Get(from, nextKey).
            let prop_value = realm.get(from, &next_key)?;
            // b. Perform ? Set(to, nextKey, propValue, true).
            realm.set(to, next_key, prop_value, true)?;
        }
    }
    // 4. Return to.
    Ok(JsValue::Object(to))
}

fn get_own_property_names(realm: &mut Realm, o: &JsValue) -> Result<JsValue, ObjectError> {
    let obj = object_argument(realm, ObjectOperation::GetOwnPropertyNames, o)?;
    let names = realm.heap().own_property_names(obj)?;
    Ok(JsValue::Object(realm.create_string_array(&names)))
}

fn get_own_property_descriptor(
    realm: &mut Realm,
    o: &JsValue,
    p: &JsValue,
) -> Result<JsValue, ObjectError> {
    let obj = object_argument(realm, ObjectOperation::GetOwnPropertyDescriptor, o)?;
    let key = realm.to_property_key(p)?;
    match realm.heap().get_own_property_descriptor(obj, &key)? {
        Some(desc) => Ok(JsValue::Object(from_property_descriptor(realm, &desc))),
        None => Ok(JsValue::Undefined),
    }
}

/// `FromPropertyDescriptor(Desc)`: a plain object with the descriptor's
/// fields in the order the language lists them.
pub fn from_property_descriptor(realm: &mut Realm, desc: &PropertyDescriptor) -> ObjectHandle {
    let accessor_value = |f: &Option<ObjectHandle>| f.map_or(JsValue::Undefined, JsValue::Object);
    match desc {
        PropertyDescriptor::Data {
            value,
            writable,
            enumerable,
            configurable,
        } => realm.create_object_from(&[
            ("value", value.clone()),
            ("writable", JsValue::Bool(*writable)),
            ("enumerable", JsValue::Bool(*enumerable)),
            ("configurable", JsValue::Bool(*configurable)),
        ]),
        PropertyDescriptor::Accessor {
            get,
            set,
            enumerable,
            configurable,
        } => realm.create_object_from(&[
            ("get", accessor_value(get)),
            ("set", accessor_value(set)),
            ("enumerable", JsValue::Bool(*enumerable)),
            ("configurable", JsValue::Bool(*configurable)),
        ]),
    }
}

/// `seal`, `freeze` and `preventExtensions`: primitives come back unchanged
/// under ES2015.
fn set_integrity_level(
    realm: &mut Realm,
    op: ObjectOperation,
    o: JsValue,
) -> Result<JsValue, ObjectError> {
    let JsValue::Object(handle) = o else {
        if realm.profile().coerces_primitives() {
            return Ok(o);
        }
        return Err(ObjectError::type_error(format!(
            "Object.{op} called on non-object {}",
            realm.inspect(&o)
        )));
    };
    match op {
        ObjectOperation::Seal => realm.heap_mut().seal(handle)?,
        ObjectOperation::Freeze => realm.heap_mut().freeze(handle)?,
        _ => {
            if !realm.heap_mut().prevent_extensions(handle)? {
                return Err(ObjectError::type_error("cannot prevent extensions"));
            }
        }
    }
    Ok(o)
}

/// `isSealed`, `isFrozen` and `isExtensible`: a primitive is treated as a
/// sealed, frozen, non-extensible object under ES2015.
fn test_integrity_level(
    realm: &mut Realm,
    op: ObjectOperation,
    o: &JsValue,
) -> Result<JsValue, ObjectError> {
    let JsValue::Object(handle) = o else {
        if realm.profile().coerces_primitives() {
            return Ok(JsValue::Bool(op != ObjectOperation::IsExtensible));
        }
        return Err(ObjectError::type_error(format!(
            "Object.{op} called on non-object {}",
            realm.inspect(o)
        )));
    };
    let heap = realm.heap();
    let result = match op {
        ObjectOperation::IsSealed => heap.is_sealed(*handle)?,
        ObjectOperation::IsFrozen => heap.is_frozen(*handle)?,
        _ => heap.is_extensible(*handle)?,
    };
    Ok(JsValue::Bool(result))
}

fn keys(realm: &mut Realm, o: &JsValue) -> Result<JsValue, ObjectError> {
    let obj = object_argument(realm, ObjectOperation::Keys, o)?;
    let keys = realm.heap().enumerable_own_string_keys(obj)?;
    Ok(JsValue::Object(realm.create_string_array(&keys)))
}

fn get_prototype_of(realm: &mut Realm, o: &JsValue) -> Result<JsValue, ObjectError> {
    let obj = object_argument(realm, ObjectOperation::GetPrototypeOf, o)?;
    Ok(realm
        .heap()
        .get_prototype_of(obj)?
        .map_or(JsValue::Null, JsValue::Object))
}

/// ### Object.setPrototypeOf ( O, proto )
///
/// Unlike the ES2015 text, a primitive `O` is rejected outright rather than
/// returned, so every non-object receiver fails the same way.
fn set_prototype_of(realm: &mut Realm, o: JsValue, proto: &JsValue) -> Result<JsValue, ObjectError> {
    let JsValue::Object(handle) = o else {
        return Err(ObjectError::type_error(format!(
            "Object.setPrototypeOf called on non-object {}",
            realm.inspect(&o)
        )));
    };
    let proto = match proto {
        JsValue::Object(p) => Some(*p),
        JsValue::Null => None,
        other => {
            return Err(ObjectError::type_error(format!(
                "object prototype may only be an object or null: {}",
                realm.inspect(other)
            )));
        }
    };
    if !realm.heap_mut().set_prototype_of(handle, proto)? {
        return Err(ObjectError::type_error(format!(
            "cannot set prototype of non-extensible {}",
            realm.inspect(&o)
        )));
    }
    Ok(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_model::{ObjectError, PropertyKey};
    use crate::realm::RealmConfig;

    fn es2015() -> Realm {
        Realm::new(RealmConfig::es2015())
    }

    fn num(n: f64) -> JsValue {
        JsValue::Number(n)
    }

    fn strings(realm: &mut Realm, value: &JsValue) -> Vec<JsValue> {
        let handle = value.as_object().expect("array");
        realm.array_values(handle).expect("values")
    }

    #[test]
    fn operation_names_round_trip_through_from_str() {
        for op in ObjectOperation::ALL {
            assert_eq!(op.method_name().parse::<ObjectOperation>(), Ok(op));
        }
        assert!("defineProperty".parse::<ObjectOperation>().is_err());
    }

    #[test]
    fn operation_serde_uses_method_names() {
        let json = serde_json::to_string(&ObjectOperation::GetOwnPropertyDescriptor).expect("ser");
        assert_eq!(json, "\"getOwnPropertyDescriptor\"");
        let op: ObjectOperation = serde_json::from_str("\"setPrototypeOf\"").expect("de");
        assert_eq!(op, ObjectOperation::SetPrototypeOf);
    }

    #[test]
    fn profile_ordering_and_parsing() {
        assert!(SemanticsProfile::Es5 < SemanticsProfile::Es2015);
        assert_eq!("es6".parse::<SemanticsProfile>(), Ok(SemanticsProfile::Es2015));
        assert!("es3".parse::<SemanticsProfile>().is_err());
        assert_eq!(SemanticsProfile::default().to_string(), "es2015");
    }

    #[test]
    fn is_uses_same_value() {
        let mut realm = es2015();
        let is = |realm: &mut Realm, a: JsValue, b: JsValue| {
            invoke(realm, ObjectOperation::Is, &[a, b]).expect("is")
        };
        assert_eq!(is(&mut realm, num(f64::NAN), num(f64::NAN)), JsValue::Bool(true));
        assert_eq!(is(&mut realm, num(0.0), num(-0.0)), JsValue::Bool(false));
        assert_eq!(is(&mut realm, JsValue::Null, JsValue::Undefined), JsValue::Bool(false));
        assert_eq!(invoke(&mut realm, ObjectOperation::Is, &[]).expect("is"), JsValue::Bool(true));
    }

    #[test]
    fn assign_copies_in_order_and_returns_target() {
        let mut realm = es2015();
        let target = realm.create_object_from(&[("a", num(1.0)), ("b", num(0.0))]);
        let s1 = realm.create_object_from(&[("b", num(2.0))]);
        let s2 = realm.create_object_from(&[("c", num(3.0)), ("b", num(4.0))]);
        let out = invoke(
            &mut realm,
            ObjectOperation::Assign,
            &[target.into(), s1.into(), JsValue::Null, s2.into()],
        )
        .expect("assign");
        assert_eq!(out, JsValue::Object(target));
        assert_eq!(
            realm.heap().enumerable_own_string_keys(target).expect("keys"),
            vec!["a", "b", "c"]
        );
        assert_eq!(realm.get(target, &"b".into()).expect("b"), num(4.0));
    }

    #[test]
    fn assign_boxes_primitive_target_and_rejects_nullish() {
        let mut realm = es2015();
        let out = invoke(&mut realm, ObjectOperation::Assign, &[num(1.0)]).expect("assign");
        let handle = out.as_object().expect("boxed");
        assert_eq!(realm.heap().class(handle).expect("class").tag(), "Number");
        let err = invoke(&mut realm, ObjectOperation::Assign, &[JsValue::Null]).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn assign_stops_at_first_rejected_write() {
        let mut realm = es2015();
        let thrower = realm.create_object_from(&[("1", num(2.0))]);
        realm.heap_mut().prevent_extensions(thrower).expect("prevent");
        let err = invoke(
            &mut realm,
            ObjectOperation::Assign,
            &[thrower.into(), JsValue::str("xy")],
        )
        .unwrap_err();
        assert!(matches!(err, ObjectError::TypeError(_)));
        assert_eq!(realm.get(thrower, &"1".into()).expect("1"), num(2.0));
        assert!(!realm.heap().has_own_property(thrower, &"0".into()).expect("0"));
    }

    #[test]
    fn assign_reads_enumerable_symbols_after_strings() {
        let mut realm = es2015();
        let source = realm.create_object();
        let sym = realm.new_symbol("enumerable").expect("symbol");
        let hidden = realm.new_symbol("non-enumerable").expect("symbol");
        let g_sym = realm.create_recording_getter(JsValue::Symbol(sym), num(f64::INFINITY));
        let g_hidden = realm.create_recording_getter(JsValue::Symbol(hidden), num(f64::NEG_INFINITY));
        let g_a = realm.create_recording_getter(JsValue::str("a"), num(42.0));
        realm
            .define_property_or_throw(source, sym.into(), PropertyDescriptor::accessor(Some(g_sym), None, true))
            .expect("define");
        realm
            .define_property_or_throw(source, hidden.into(), PropertyDescriptor::accessor(Some(g_hidden), None, false))
            .expect("define");
        realm
            .define_property_or_throw(source, "a".into(), PropertyDescriptor::accessor(Some(g_a), None, true))
            .expect("define");

        let target = realm.create_object();
        invoke(&mut realm, ObjectOperation::Assign, &[target.into(), source.into()]).expect("assign");
        assert_eq!(realm.journal(), &[JsValue::str("a"), JsValue::Symbol(sym)]);
        assert_eq!(
            realm.heap().own_property_keys(target).expect("keys"),
            vec![PropertyKey::from("a"), PropertyKey::Symbol(sym)]
        );
    }

    #[test]
    fn introspection_boxes_primitives_under_es2015() {
        let mut realm = es2015();
        let names = invoke(&mut realm, ObjectOperation::GetOwnPropertyNames, &[JsValue::str("ab")])
            .expect("names");
        assert_eq!(
            strings(&mut realm, &names),
            vec![JsValue::str("0"), JsValue::str("1"), JsValue::str("length")]
        );
        let keys = invoke(&mut realm, ObjectOperation::Keys, &[num(42.0)]).expect("keys");
        assert!(strings(&mut realm, &keys).is_empty());
        let proto = invoke(&mut realm, ObjectOperation::GetPrototypeOf, &[JsValue::Bool(true)])
            .expect("proto");
        assert_eq!(proto, JsValue::Object(realm.intrinsics().boolean_prototype));
    }

    #[test]
    fn introspection_rejects_nullish_and_primitives_under_es5() {
        let mut modern = es2015();
        let mut legacy = Realm::new(RealmConfig::es5());
        for op in [
            ObjectOperation::GetOwnPropertyNames,
            ObjectOperation::Keys,
            ObjectOperation::GetPrototypeOf,
        ] {
            assert!(invoke(&mut modern, op, &[]).unwrap_err().is_type_error());
            assert!(invoke(&mut modern, op, &[JsValue::Null]).unwrap_err().is_type_error());
            assert!(invoke(&mut legacy, op, &[JsValue::str("x")]).unwrap_err().is_type_error());
        }
        for op in [ObjectOperation::Seal, ObjectOperation::IsFrozen] {
            assert!(invoke(&mut legacy, op, &[num(1.0)]).unwrap_err().is_type_error());
        }
    }

    #[test]
    fn descriptor_objects_have_language_field_order() {
        let mut realm = es2015();
        let obj = realm.create_object_from(&[("x", num(1.0))]);
        let desc = invoke(
            &mut realm,
            ObjectOperation::GetOwnPropertyDescriptor,
            &[obj.into(), JsValue::str("x")],
        )
        .expect("descriptor");
        let handle = desc.as_object().expect("object");
        assert_eq!(
            realm.heap().enumerable_own_string_keys(handle).expect("keys"),
            vec!["value", "writable", "enumerable", "configurable"]
        );
        assert_eq!(realm.get(handle, &"writable".into()).expect("w"), JsValue::Bool(true));

        let missing = invoke(
            &mut realm,
            ObjectOperation::GetOwnPropertyDescriptor,
            &[JsValue::str("foo"), JsValue::str("foo")],
        )
        .expect("missing");
        assert_eq!(missing, JsValue::Undefined);

        let index = invoke(
            &mut realm,
            ObjectOperation::GetOwnPropertyDescriptor,
            &[JsValue::str("foo"), num(0.0)],
        )
        .expect("index");
        let index = index.as_object().expect("object");
        assert_eq!(realm.get(index, &"value".into()).expect("value"), JsValue::str("f"));
    }

    #[test]
    fn integrity_operations_on_primitives() {
        let mut realm = es2015();
        for op in [ObjectOperation::Seal, ObjectOperation::Freeze, ObjectOperation::PreventExtensions] {
            let out = invoke(&mut realm, op, &[JsValue::str("foo")]).expect("op");
            assert_eq!(out, JsValue::str("foo"));
        }
        for (op, expected) in [
            (ObjectOperation::IsSealed, true),
            (ObjectOperation::IsFrozen, true),
            (ObjectOperation::IsExtensible, false),
        ] {
            let out = invoke(&mut realm, op, &[JsValue::Undefined]).expect("op");
            assert_eq!(out, JsValue::Bool(expected));
        }
    }

    #[test]
    fn integrity_operations_on_objects() {
        let mut realm = es2015();
        let obj = realm.create_object_from(&[("a", num(1.0))]);
        invoke(&mut realm, ObjectOperation::Freeze, &[obj.into()]).expect("freeze");
        assert_eq!(
            invoke(&mut realm, ObjectOperation::IsFrozen, &[obj.into()]).expect("frozen"),
            JsValue::Bool(true)
        );
        assert_eq!(
            invoke(&mut realm, ObjectOperation::IsExtensible, &[obj.into()]).expect("ext"),
            JsValue::Bool(false)
        );
    }

    #[test]
    fn set_prototype_of_validates_and_links() {
        let mut realm = es2015();
        let obj = realm.create_object();
        let proto = realm.create_object();
        let out = invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[obj.into(), proto.into()])
            .expect("set");
        assert_eq!(out, JsValue::Object(obj));
        assert_eq!(realm.heap().get_prototype_of(obj).expect("proto"), Some(proto));

        invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[obj.into(), JsValue::Null])
            .expect("null");
        assert_eq!(realm.heap().get_prototype_of(obj).expect("proto"), None);

        for bad in [JsValue::Null, num(3.0), JsValue::str("foo")] {
            let err = invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[bad, JsValue::Null])
                .unwrap_err();
            assert!(err.is_type_error());
        }
        let err = invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[obj.into(), JsValue::Bool(true)])
            .unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn set_prototype_of_rejects_cycles_and_non_extensible_targets() {
        let mut realm = es2015();
        let a = realm.create_object();
        let b = realm.heap_mut().alloc(Some(a));
        let err = invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[a.into(), b.into()])
            .unwrap_err();
        assert_eq!(err, ObjectError::PrototypeCycleDetected);
        assert!(err.is_type_error());

        realm.heap_mut().prevent_extensions(b).expect("prevent");
        let fresh = realm.create_object();
        let err = invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[b.into(), fresh.into()])
            .unwrap_err();
        assert!(matches!(err, ObjectError::TypeError(_)));
        // Re-setting the current prototype is allowed.
        invoke(&mut realm, ObjectOperation::SetPrototypeOf, &[b.into(), a.into()]).expect("same");
    }
}
