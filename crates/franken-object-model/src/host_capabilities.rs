//! Host capability probing.
//!
//! Capabilities are probed once in a throwaway realm and are read-only from
//! then on. They decide which conformance groups run and which are reported
//! as skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::object_builtins::ObjectOperation;
use crate::object_model::{FunctionKind, JsValue};
use crate::realm::HostEnvironment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapabilities {
    pub host_id: String,
    /// `(function foo() {}).name === "foo"`.
    pub functions_have_names: bool,
    /// `Object.preventExtensions` is callable.
    pub extensions_preventable: bool,
    /// `typeof Symbol() === "symbol"`.
    pub has_symbols: bool,
    /// Presence of each operation as an own property of `Object`.
    pub operations: BTreeMap<ObjectOperation, bool>,
}

impl HostCapabilities {
    pub fn detect(host: &dyn HostEnvironment) -> Self {
        let mut realm = host.fresh_realm();

        let probe = realm.create_function("foo", 0, FunctionKind::Plain);
        let functions_have_names = matches!(
            realm.get(probe, &"name".into()),
            Ok(JsValue::Str(name)) if name == "foo"
        );

        let has_symbols = matches!(realm.new_symbol(""), Ok(_));

        let namespace = realm.object_namespace();
        let operations: BTreeMap<ObjectOperation, bool> = ObjectOperation::ALL
            .into_iter()
            .map(|op| {
                let present = realm
                    .heap()
                    .has_own_property(namespace, &op.method_name().into())
                    .unwrap_or(false);
                (op, present)
            })
            .collect();

        let extensions_preventable = match realm.get(namespace, &"preventExtensions".into()) {
            Ok(JsValue::Object(method)) => realm.heap().is_callable(method).unwrap_or(false),
            _ => false,
        };

        Self {
            host_id: host.host_id(),
            functions_have_names,
            extensions_preventable,
            has_symbols,
            operations,
        }
    }

    pub fn supports(&self, op: ObjectOperation) -> bool {
        self.operations.get(&op).copied().unwrap_or(false)
    }

    /// Operations the host does not install, in declaration order.
    pub fn missing_operations(&self) -> Vec<ObjectOperation> {
        ObjectOperation::ALL
            .into_iter()
            .filter(|op| !self.supports(*op))
            .collect()
    }

    /// Compact `name=0|1` rendering used in logs and fingerprints.
    pub fn describe(&self) -> String {
        let mut parts = vec![
            format!("function_names={}", u8::from(self.functions_have_names)),
            format!("extensions_preventable={}", u8::from(self.extensions_preventable)),
            format!("symbols={}", u8::from(self.has_symbols)),
        ];
        for (op, present) in &self.operations {
            parts.push(format!("{op}={}", u8::from(*present)));
        }
        parts.join(";")
    }

    pub fn fingerprint(&self) -> String {
        let envelope = format!("host={};{}", self.host_id, self.describe());
        hex::encode(Sha256::digest(envelope.as_bytes()))
    }
}
