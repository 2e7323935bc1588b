//! Behavioral contracts for the `Object` static operations.
//!
//! Every case runs against a fresh realm from the host under test and talks
//! to the operations only through the realm's `Object` namespace, the way
//! script code would. Expected values are derived independently of the
//! operation being checked (boxed-primitive comparisons, host predicates).

use crate::conformance_harness::{
    CaseFailure, CaseResult, ConformanceRunError, ConformanceRunResult, ConformanceRunner,
    ConformanceRunnerConfig, Suite, SuiteBuilder, ensure, ensure_eq,
};
use crate::host_capabilities::HostCapabilities;
use crate::object_builtins::ObjectOperation;
use crate::object_model::{JsValue, ObjectError, ObjectHandle, PropertyDescriptor};
use crate::realm::{HostEnvironment, Realm};

pub const SUITE_NAME: &str = "Object";

/// Per-case state: the realm the case runs in.
#[derive(Debug, Clone)]
pub struct ObjectConformanceContext {
    pub realm: Realm,
}

impl ObjectConformanceContext {
    pub fn new(realm: Realm) -> Self {
        Self { realm }
    }

    /// `Object.<name>(...args)`.
    pub fn call(&mut self, name: &str, args: &[JsValue]) -> Result<JsValue, ObjectError> {
        self.realm.call_object_method(name, args)
    }

    fn render_call(&self, name: &str, args: &[JsValue]) -> String {
        let rendered: Vec<String> = args.iter().map(|a| self.realm.inspect(a)).collect();
        format!("Object.{name}({})", rendered.join(", "))
    }

    /// `expect(() => Object.<name>(...args)).to.throw(TypeError)`.
    pub fn expect_type_error(&mut self, name: &str, args: &[JsValue]) -> CaseResult {
        let label = self.render_call(name, args);
        match self.call(name, args) {
            Err(err) if err.is_type_error() => Ok(()),
            Err(err) => Err(CaseFailure::from(err)),
            Ok(value) => Err(CaseFailure::assertion(
                format!("{label} should throw"),
                "TypeError",
                format!("returned {}", self.realm.inspect(&value)),
            )),
        }
    }

    /// `expect(() => Object.<name>(...args)).not.to.throw(TypeError)`.
    pub fn expect_no_type_error(&mut self, name: &str, args: &[JsValue]) -> CaseResult {
        let label = self.render_call(name, args);
        match self.call(name, args) {
            Ok(_) => Ok(()),
            Err(err) if err.is_type_error() => Err(CaseFailure::assertion(
                format!("{label} should not throw"),
                "no exception",
                err.to_string(),
            )),
            Err(err) => Err(CaseFailure::from(err)),
        }
    }

    /// `expect(actual).to.equal(expected)`: strict equality.
    pub fn expect_equal(&self, actual: &JsValue, expected: &JsValue, message: &str) -> CaseResult {
        if actual.strict_equals(expected) {
            Ok(())
        } else {
            Err(CaseFailure::assertion(
                message,
                self.realm.inspect(expected),
                self.realm.inspect(actual),
            ))
        }
    }

    /// `expect(actual).to.eql(expected)`: deep equality.
    pub fn expect_eql(&mut self, actual: &JsValue, expected: &JsValue, message: &str) -> CaseResult {
        if self.realm.deep_equal(actual, expected)? {
            Ok(())
        } else {
            Err(CaseFailure::assertion(
                message,
                self.realm.inspect(expected),
                self.realm.inspect(actual),
            ))
        }
    }

    /// `expect(target).to.have.property(key[, expected])`.
    pub fn expect_property(
        &mut self,
        target: ObjectHandle,
        key: &str,
        expected: Option<&JsValue>,
    ) -> CaseResult {
        let owner = self.realm.inspect(&JsValue::Object(target));
        if !self.realm.heap().has_property(target, &key.into())? {
            return Err(CaseFailure::assertion(
                format!("{owner} should have property '{key}'"),
                format!("property '{key}'"),
                "no such property",
            ));
        }
        let Some(expected) = expected else {
            return Ok(());
        };
        let actual = self.realm.get(target, &key.into())?;
        self.expect_equal(&actual, expected, &format!("{owner}.{key}"))
    }

    /// `null, undefined, true, false, NaN, 42, 'foo'`.
    pub fn primitives(&self) -> Vec<JsValue> {
        vec![
            JsValue::Null,
            JsValue::Undefined,
            JsValue::Bool(true),
            JsValue::Bool(false),
            JsValue::Number(f64::NAN),
            JsValue::Number(42.0),
            JsValue::str("foo"),
        ]
    }

    /// `true, false, NaN, 42, /a/g, 'foo'`.
    pub fn coercible_items(&mut self) -> Vec<JsValue> {
        let regexp = self.realm.create_regexp("a", "g");
        vec![
            JsValue::Bool(true),
            JsValue::Bool(false),
            JsValue::Number(f64::NAN),
            JsValue::Number(42.0),
            JsValue::Object(regexp),
            JsValue::str("foo"),
        ]
    }

    pub fn object(&mut self, entries: &[(&str, JsValue)]) -> JsValue {
        JsValue::Object(self.realm.create_object_from(entries))
    }

    /// Method object `Object.<name>`.
    pub fn method(&mut self, name: &str) -> Result<ObjectHandle, CaseFailure> {
        let namespace = self.realm.object_namespace();
        match self.realm.get(namespace, &name.into())? {
            JsValue::Object(method) => Ok(method),
            other => Err(CaseFailure::assertion(
                format!("Object.{name}"),
                "a function",
                self.realm.inspect(&other),
            )),
        }
    }
}

fn num(n: f64) -> JsValue {
    JsValue::Number(n)
}

fn not_installed(op: ObjectOperation) -> String {
    format!("Object.{op} is not installed")
}

/// Register the whole `Object` suite for a host with the given capabilities.
pub fn object_conformance_suite(
    caps: &HostCapabilities,
) -> Result<Suite<ObjectConformanceContext>, ConformanceRunError> {
    let mut suite: Builder = SuiteBuilder::new(SUITE_NAME);

    suite.it("is installed on the global object", |ctx| {
        let global = ctx.realm.intrinsics().global_object;
        let namespace = JsValue::Object(ctx.realm.object_namespace());
        ctx.expect_property(global, "Object", Some(&namespace))
    });

    register_own_property_names(&mut suite, caps);
    register_own_property_descriptor(&mut suite, caps);
    register_integrity_levels(&mut suite, caps);
    register_keys(&mut suite, caps);
    register_is(&mut suite, caps);
    register_assign(&mut suite, caps);
    register_set_prototype_of(&mut suite, caps);

    suite.build()
}

type Builder = SuiteBuilder<ObjectConformanceContext>;

fn register_own_property_names(suite: &mut Builder, caps: &HostCapabilities) {
    let op = ObjectOperation::GetOwnPropertyNames;
    suite.describe_if(caps.supports(op), &not_installed(op), ".getOwnPropertyNames()", |s| {
        s.it("throws on null or undefined", |ctx| {
            ctx.expect_type_error("getOwnPropertyNames", &[])?;
            ctx.expect_type_error("getOwnPropertyNames", &[JsValue::Undefined])?;
            ctx.expect_type_error("getOwnPropertyNames", &[JsValue::Null])
        });

        s.it("works on primitives", |ctx| {
            for item in ctx.coercible_items() {
                let actual = ctx.call("getOwnPropertyNames", std::slice::from_ref(&item))?;
                let boxed = ctx.realm.box_value(&item)?;
                let expected = ctx.call("getOwnPropertyNames", &[boxed])?;
                let message = format!(
                    "getOwnPropertyNames({}) matches the boxed form",
                    ctx.realm.inspect(&item)
                );
                ctx.expect_eql(&actual, &expected, &message)?;
            }
            Ok(())
        });
    });
}

fn register_own_property_descriptor(suite: &mut Builder, caps: &HostCapabilities) {
    let op = ObjectOperation::GetOwnPropertyDescriptor;
    suite.describe_if(caps.supports(op), &not_installed(op), ".getOwnPropertyDescriptor()", |s| {
        s.it("throws on null or undefined", |ctx| {
            ctx.expect_type_error("getOwnPropertyDescriptor", &[])?;
            ctx.expect_type_error("getOwnPropertyDescriptor", &[JsValue::Undefined])?;
            ctx.expect_type_error("getOwnPropertyDescriptor", &[JsValue::Null])
        });

        s.it("works on primitives", |ctx| {
            for item in ctx.coercible_items() {
                let key = JsValue::str("foo");
                let actual = ctx.call("getOwnPropertyDescriptor", &[item.clone(), key.clone()])?;
                let boxed = ctx.realm.box_value(&item)?;
                let expected = ctx.call("getOwnPropertyDescriptor", &[boxed, key])?;
                let message = format!(
                    "getOwnPropertyDescriptor({}, 'foo') matches the boxed form",
                    ctx.realm.inspect(&item)
                );
                ctx.expect_eql(&actual, &expected, &message)?;
            }
            Ok(())
        });
    });
}

fn register_integrity_levels(suite: &mut Builder, caps: &HostCapabilities) {
    // Operations that hand primitives back unchanged.
    for op in [
        ObjectOperation::Seal,
        ObjectOperation::Freeze,
        ObjectOperation::PreventExtensions,
    ] {
        let group = format!(".{op}()");
        suite.describe_if(caps.supports(op), &not_installed(op), &group, |s| {
            s.it("works on primitives", move |ctx| {
                for item in ctx.primitives() {
                    let actual = ctx.call(op.method_name(), std::slice::from_ref(&item))?;
                    let message = format!("{op}({}) returns its input", ctx.realm.inspect(&item));
                    ctx.expect_eql(&actual, &item, &message)?;
                }
                Ok(())
            });
        });
    }

    // Predicates with a fixed answer for every primitive.
    for (op, expected) in [
        (ObjectOperation::IsSealed, true),
        (ObjectOperation::IsFrozen, true),
        (ObjectOperation::IsExtensible, false),
    ] {
        let group = format!(".{op}()");
        suite.describe_if(caps.supports(op), &not_installed(op), &group, |s| {
            s.it("works on primitives", move |ctx| {
                for item in ctx.primitives() {
                    let actual = ctx.call(op.method_name(), std::slice::from_ref(&item))?;
                    let message = format!("{op}({})", ctx.realm.inspect(&item));
                    ctx.expect_equal(&actual, &JsValue::Bool(expected), &message)?;
                }
                Ok(())
            });
        });
    }
}

fn register_keys(suite: &mut Builder, caps: &HostCapabilities) {
    let op = ObjectOperation::Keys;
    suite.describe_if(caps.supports(op), &not_installed(op), ".keys()", |s| {
        s.it("works on strings", |ctx| {
            let actual = ctx.call("keys", &[JsValue::str("foo")])?;
            let expected = ctx
                .realm
                .create_string_array(&["0".to_string(), "1".to_string(), "2".to_string()]);
            ctx.expect_eql(&actual, &JsValue::Object(expected), "keys('foo')")
        });

        s.it("throws on null or undefined", |ctx| {
            ctx.expect_type_error("keys", &[])?;
            ctx.expect_type_error("keys", &[JsValue::Undefined])?;
            ctx.expect_type_error("keys", &[JsValue::Null])
        });

        s.it("works on other primitives", |ctx| {
            let mut items = ctx.coercible_items();
            items.retain(|item| !matches!(item, JsValue::Str(_)));
            for item in items {
                let actual = ctx.call("keys", std::slice::from_ref(&item))?;
                let empty = JsValue::Object(ctx.realm.create_array(&[]));
                let message = format!("keys({})", ctx.realm.inspect(&item));
                ctx.expect_eql(&actual, &empty, &message)?;
            }
            Ok(())
        });
    });
}

/// `it('exists')` for an operation the host should have installed.
fn register_exists(s: &mut Builder, name: &'static str) {
    s.it("exists", move |ctx| {
        let namespace = ctx.realm.object_namespace();
        ctx.expect_property(namespace, name, None)
    });
}

fn register_is(suite: &mut Builder, caps: &HostCapabilities) {
    let supported = caps.supports(ObjectOperation::Is);
    let named = caps.functions_have_names;
    suite.describe(".is()", |s| {
        if !supported {
            register_exists(s, "is");
            return;
        }

        s.it_if(named, "functions have no name property", "has the right name", |ctx| {
            let is = ctx.method("is")?;
            ctx.expect_property(is, "name", Some(&JsValue::str("is")))
        });

        s.it("should have the right arity", |ctx| {
            let is = ctx.method("is")?;
            ctx.expect_property(is, "length", Some(&num(2.0)))
        });

        s.it("should compare regular objects correctly", |ctx| {
            let array = JsValue::Object(ctx.realm.create_array(&[num(0.0)]));
            let object = ctx.object(&[("a", JsValue::Null)]);
            let items = [
                JsValue::Null,
                JsValue::Undefined,
                array,
                num(5.0),
                JsValue::str("str"),
                object,
            ];
            for item in items {
                let result = ctx.call("is", &[item.clone(), item.clone()])?;
                let message = format!("is({0}, {0})", ctx.realm.inspect(&item));
                ctx.expect_equal(&result, &JsValue::Bool(true), &message)?;
            }
            Ok(())
        });

        s.it("should compare 0 and -0 correctly", |ctx| {
            let result = ctx.call("is", &[num(0.0), num(-0.0)])?;
            ctx.expect_equal(&result, &JsValue::Bool(false), "is(0, -0)")
        });

        s.it("should compare NaNs correctly", |ctx| {
            let result = ctx.call("is", &[num(f64::NAN), num(f64::NAN)])?;
            ctx.expect_equal(&result, &JsValue::Bool(true), "is(NaN, NaN)")
        });
    });
}

fn register_assign(suite: &mut Builder, caps: &HostCapabilities) {
    let supported = caps.supports(ObjectOperation::Assign);
    let preventable = caps.extensions_preventable;
    let symbols = caps.has_symbols;
    suite.describe(".assign()", |s| {
        if !supported {
            register_exists(s, "assign");
            return;
        }

        s.it("has the correct length", |ctx| {
            let assign = ctx.method("assign")?;
            let length = ctx.realm.get(assign, &"length".into())?;
            ctx.expect_eql(&length, &num(2.0), "Object.assign.length")
        });

        s.it("returns the modified target object", |ctx| {
            let target = ctx.object(&[]);
            let source = ctx.object(&[("a", num(1.0))]);
            let returned = ctx.call("assign", &[target.clone(), source])?;
            ctx.expect_equal(&returned, &target, "assign returns its target")
        });

        s.it("should merge two objects", |ctx| {
            let target = ctx.object(&[("a", num(1.0))]);
            let source = ctx.object(&[("b", num(2.0))]);
            let returned = ctx.call("assign", &[target, source])?;
            let expected = ctx.object(&[("a", num(1.0)), ("b", num(2.0))]);
            ctx.expect_eql(&returned, &expected, "assign({a:1}, {b:2})")
        });

        s.it("should merge three objects", |ctx| {
            let target = ctx.object(&[("a", num(1.0))]);
            let source1 = ctx.object(&[("b", num(2.0))]);
            let source2 = ctx.object(&[("c", num(3.0))]);
            let returned = ctx.call("assign", &[target, source1, source2])?;
            let expected = ctx.object(&[("a", num(1.0)), ("b", num(2.0)), ("c", num(3.0))]);
            ctx.expect_eql(&returned, &expected, "assign({a:1}, {b:2}, {c:3})")
        });

        s.it("only iterates over own keys", |ctx| {
            let foo_ctor = ctx.realm.create_constructor("Foo")?;
            let JsValue::Object(prototype) = ctx.realm.get(foo_ctor, &"prototype".into())? else {
                return Err(CaseFailure::Unexpected("Foo.prototype is not an object".into()));
            };
            ctx.realm.set(prototype, "bar".into(), JsValue::Bool(true), true)?;
            let foo = ctx.realm.construct(foo_ctor)?;
            ctx.realm.set(foo, "baz".into(), JsValue::Bool(true), true)?;

            let target = ctx.object(&[("a", num(1.0))]);
            let returned = ctx.call("assign", &[target.clone(), JsValue::Object(foo)])?;
            ctx.expect_equal(&returned, &target, "assign returns its target")?;
            let expected = ctx.object(&[("baz", JsValue::Bool(true)), ("a", num(1.0))]);
            ctx.expect_eql(&target, &expected, "inherited enumerable keys are not copied")
        });

        s.it("throws when target is not an object", |ctx| {
            ctx.expect_type_error("assign", &[JsValue::Null])
        });

        s.it("ignores non-object sources", |ctx| {
            for (position, nullish) in [(1, JsValue::Null), (1, JsValue::Undefined), (2, JsValue::Null)] {
                let target = ctx.object(&[("a", num(1.0))]);
                let source = ctx.object(&[("b", num(2.0))]);
                let args = if position == 1 {
                    vec![target, nullish.clone(), source]
                } else {
                    vec![target, source, nullish.clone()]
                };
                let label = ctx.render_call("assign", &args);
                let returned = ctx.call("assign", &args)?;
                let expected = ctx.object(&[("a", num(1.0)), ("b", num(2.0))]);
                ctx.expect_eql(&returned, &expected, &label)?;
            }
            Ok(())
        });

        s.it_if(
            preventable,
            "Object.preventExtensions is not available",
            "does not have pending exceptions",
            |ctx| {
                let literal = ctx.object(&[("1", num(2.0))]);
                let thrower = ctx.call("preventExtensions", &[literal])?;
                let JsValue::Object(handle) = thrower else {
                    return Err(CaseFailure::Unexpected(
                        "preventExtensions did not return its object".into(),
                    ));
                };
                ctx.expect_type_error("assign", &[thrower, JsValue::str("xy")])?;
                ctx.expect_property(handle, "1", Some(&num(2.0)))
            },
        );

        s.it_if(
            symbols,
            "Symbol is not available",
            "includes enumerable symbols, after keys",
            |ctx| {
                let obj = ctx.realm.create_object();
                let getter_a = ctx.realm.create_recording_getter(JsValue::str("a"), num(42.0));
                ctx.realm.define_property_or_throw(
                    obj,
                    "a".into(),
                    PropertyDescriptor::accessor(Some(getter_a), None, true),
                )?;
                let symbol = ctx.realm.new_symbol("enumerable")?;
                let getter_symbol = ctx
                    .realm
                    .create_recording_getter(JsValue::Symbol(symbol), num(f64::INFINITY));
                ctx.realm.define_property_or_throw(
                    obj,
                    symbol.into(),
                    PropertyDescriptor::accessor(Some(getter_symbol), None, true),
                )?;
                let hidden = ctx.realm.new_symbol("non-enumerable")?;
                let getter_hidden = ctx
                    .realm
                    .create_recording_getter(JsValue::Symbol(hidden), num(f64::NEG_INFINITY));
                ctx.realm.define_property_or_throw(
                    obj,
                    hidden.into(),
                    PropertyDescriptor::accessor(Some(getter_hidden), None, false),
                )?;

                let empty = ctx.object(&[]);
                let target = ctx.call("assign", &[empty, JsValue::Object(obj)])?;
                let Some(target) = target.as_object() else {
                    return Err(CaseFailure::Unexpected("assign did not return an object".into()));
                };

                let visited = ctx.realm.journal().to_vec();
                ensure_eq(visited.len(), 2, "getter invocations")?;
                let visited = JsValue::Object(ctx.realm.create_array(&visited));
                let expected = JsValue::Object(
                    ctx.realm
                        .create_array(&[JsValue::str("a"), JsValue::Symbol(symbol)]),
                );
                ctx.expect_eql(&visited, &expected, "getters run once each, strings first")?;

                let a = ctx.realm.get(target, &"a".into())?;
                ctx.expect_equal(&a, &num(42.0), "target.a")?;
                let copied = ctx.realm.get(target, &symbol.into())?;
                ctx.expect_equal(&copied, &num(f64::INFINITY), "target[symbol]")?;
                let skipped = ctx.realm.get(target, &hidden.into())?;
                ensure(
                    !skipped.strict_equals(&num(f64::NEG_INFINITY)),
                    "non-enumerable symbol is not copied",
                )
            },
        );
    });
}

fn register_set_prototype_of(suite: &mut Builder, caps: &HostCapabilities) {
    let op = ObjectOperation::SetPrototypeOf;
    suite.describe_if(caps.supports(op), &not_installed(op), "Object.setPrototypeOf()", |s| {
        s.describe("argument checking", |s| {
            s.it("should throw TypeError if first arg is not object", |ctx| {
                let non_objects = [
                    JsValue::Null,
                    JsValue::Undefined,
                    JsValue::Bool(true),
                    JsValue::Bool(false),
                    num(1.0),
                    num(3.0),
                    JsValue::str("foo"),
                ];
                for value in non_objects {
                    ctx.expect_type_error("setPrototypeOf", &[value])?;
                }
                Ok(())
            });

            s.it("should throw TypeError if second arg is not object or null", |ctx| {
                let target = ctx.object(&[]);
                ctx.expect_no_type_error("setPrototypeOf", &[target, JsValue::Null])?;
                let invalid = [
                    JsValue::Bool(true),
                    JsValue::Bool(false),
                    num(1.0),
                    num(3.0),
                    JsValue::str("foo"),
                ];
                for proto in invalid {
                    let target = ctx.object(&[]);
                    ctx.expect_type_error("setPrototypeOf", &[target, proto])?;
                }
                Ok(())
            });
        });

        s.describe("set prototype", |s| {
            s.it("should work", |ctx| {
                let foo_ctor = ctx.realm.create_constructor("Foo")?;
                let bar = ctx.object(&[]);
                let foo = JsValue::Object(ctx.realm.construct(foo_ctor)?);
                let foo_prototype = ctx.realm.get(foo_ctor, &"prototype".into())?;

                let proto = ctx.call("getPrototypeOf", std::slice::from_ref(&foo))?;
                ctx.expect_equal(&proto, &foo_prototype, "getPrototypeOf(new Foo())")?;

                let foo_bar = ctx.call("setPrototypeOf", &[foo.clone(), bar.clone()])?;
                ctx.expect_equal(&foo_bar, &foo, "setPrototypeOf returns its target")?;
                let proto = ctx.call("getPrototypeOf", std::slice::from_ref(&foo))?;
                ctx.expect_equal(&proto, &bar, "getPrototypeOf after setPrototypeOf")
            });

            s.it("should be able to set to null", |ctx| {
                let foo_ctor = ctx.realm.create_constructor("Foo")?;
                let foo = JsValue::Object(ctx.realm.construct(foo_ctor)?);

                let foo_null = ctx.call("setPrototypeOf", &[foo.clone(), JsValue::Null])?;
                ctx.expect_equal(&foo_null, &foo, "setPrototypeOf returns its target")?;
                let proto = ctx.call("getPrototypeOf", std::slice::from_ref(&foo))?;
                ctx.expect_equal(&proto, &JsValue::Null, "getPrototypeOf after detaching")
            });
        });
    });
}

/// Probe `host`, register the suite for its capabilities and run it.
///
/// The run's log starts with a `capability_probe` event describing the
/// detected capabilities, followed by one `case_execution` event per case.
pub fn run_object_conformance(
    host: &dyn HostEnvironment,
    config: &ConformanceRunnerConfig,
) -> Result<ConformanceRunResult, ConformanceRunError> {
    let caps = HostCapabilities::detect(host);
    let suite = object_conformance_suite(&caps)?;
    let runner = ConformanceRunner::new(config.clone());
    let mut result = runner.run(&suite, &caps.fingerprint(), || {
        ObjectConformanceContext::new(host.fresh_realm())
    })?;

    let mut probe = runner.tagged_event(&result.run_id, "probe", "capability_probe", "pass");
    probe.suite = SUITE_NAME.to_string();
    probe.error_detail = Some(format!("host={};{}", caps.host_id, caps.describe()));
    result.logs.insert(0, probe);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance_harness::CaseOutcome;
    use crate::realm::RealmConfig;

    fn context() -> ObjectConformanceContext {
        ObjectConformanceContext::new(Realm::new(RealmConfig::es2015()))
    }

    #[test]
    fn expect_type_error_reports_returned_value() {
        let mut ctx = context();
        let err = ctx.expect_type_error("keys", &[num(1.0)]).unwrap_err();
        assert_eq!(
            err,
            CaseFailure::assertion("Object.keys(1) should throw", "TypeError", "returned []")
        );
        assert!(ctx.expect_type_error("keys", &[JsValue::Null]).is_ok());
    }

    #[test]
    fn expect_eql_and_equal_differ_on_fresh_objects() {
        let mut ctx = context();
        let a = ctx.object(&[("x", num(1.0))]);
        let b = ctx.object(&[("x", num(1.0))]);
        assert!(ctx.expect_eql(&a, &b, "deep").is_ok());
        let err = ctx.expect_equal(&a, &b, "strict").unwrap_err();
        assert_eq!(err.outcome(), CaseOutcome::Failed);
    }

    #[test]
    fn expect_property_checks_presence_and_value() {
        let mut ctx = context();
        let namespace = ctx.realm.object_namespace();
        assert!(ctx.expect_property(namespace, "keys", None).is_ok());
        assert!(ctx.expect_property(namespace, "nope", None).is_err());
        let is = ctx.method("is").expect("method");
        assert!(ctx.expect_property(is, "length", Some(&num(2.0))).is_ok());
        assert!(ctx.expect_property(is, "length", Some(&num(1.0))).is_err());
    }

    #[test]
    fn type_errors_fail_while_other_escapes_error() {
        let mut ctx = ObjectConformanceContext::new(Realm::new(RealmConfig::es5()));
        let err = ctx.expect_no_type_error("setPrototypeOf", &[]).unwrap_err();
        assert_eq!(err.outcome(), CaseOutcome::Failed);
        let err: CaseFailure = ctx
            .call("getOwnPropertyNames", &[JsValue::Bool(true)])
            .unwrap_err()
            .into();
        assert_eq!(err.outcome(), CaseOutcome::Errored);
    }

    #[test]
    fn es2015_suite_registers_every_case() {
        let caps = HostCapabilities::detect(&RealmConfig::es2015());
        let suite = object_conformance_suite(&caps).expect("suite");
        assert_eq!(suite.len(), 32);
        assert!(suite.cases().iter().all(|case| case.skip_reason().is_none()));
        assert!(
            suite
                .cases()
                .iter()
                .any(|case| case.case_id == "Object .assign() includes enumerable symbols, after keys")
        );
    }

    #[test]
    fn es5_suite_replaces_missing_groups() {
        let caps = HostCapabilities::detect(&RealmConfig::es5());
        let suite = object_conformance_suite(&caps).expect("suite");
        let ids: Vec<&str> = suite.cases().iter().map(|c| c.case_id.as_str()).collect();
        assert!(ids.contains(&"Object .is() exists"));
        assert!(ids.contains(&"Object .assign() exists"));
        assert!(!ids.iter().any(|id| id.contains("merge")));
        let skipped: Vec<&str> = suite
            .cases()
            .iter()
            .filter(|c| c.skip_reason().is_some())
            .map(|c| c.case_id.as_str())
            .collect();
        assert_eq!(skipped.len(), 4);
        assert!(skipped.iter().all(|id| id.starts_with("Object Object.setPrototypeOf()")));
    }

    #[test]
    fn run_starts_with_capability_probe() {
        let run = run_object_conformance(&RealmConfig::es2015(), &ConformanceRunnerConfig::default())
            .expect("run");
        let probe = &run.logs[0];
        assert_eq!(probe.event, "capability_probe");
        assert_eq!(probe.component, "object_conformance_runner");
        assert_eq!(probe.trace_id, format!("trace-object-conformance-{}-probe", run.run_id));
        assert_eq!(probe.decision_id, "decision-object-conformance-probe");
        assert_eq!(run.logs[1].decision_id, "decision-object-conformance-0000");
        assert!(
            probe
                .error_detail
                .as_deref()
                .is_some_and(|d| d.starts_with("host=es2015;function_names=1"))
        );
        assert_eq!(run.logs.len(), run.summary.total_cases + 1);
    }
}
