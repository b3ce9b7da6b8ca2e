//! SOL-003: Scripted-syntax loader.
//!
//! Executes an untrusted configuration script inside a fresh, capability-
//! restricted rhai engine. The entire host surface exposed to scripts is one
//! primitive:
//!
//! ```text
//! register(type, name, params?, deps?)
//! ```
//!
//! No filesystem, network, or process access is bound. Each call to
//! [`load_scripted`] builds its own engine and discards it after harvesting
//! the registration records, so scripts cannot observe or mutate state across
//! loads.
//!
//! Loading is all-or-nothing per file: a script failure or a single
//! malformed registration record aborts the load with a diagnostic and no
//! partial resource set.

use super::diag::{Diagnostic, Diagnostics};
use super::resource::{normalize, Resource};
use indexmap::IndexMap;
use rhai::{Array, Dynamic, Engine, ImmutableString, Map};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// A raw registration record, harvested before any field validation.
///
/// Params/deps are `None` when the script omitted the optional argument.
#[derive(Debug, Clone)]
struct RawRecord {
    type_: Dynamic,
    name: Dynamic,
    params: Option<Dynamic>,
    deps: Option<Dynamic>,
}

/// Load a scripted-syntax configuration from raw source text.
///
/// `path` is used only for diagnostic attribution. On any failure the
/// resource list is empty; otherwise resources come back in registration
/// order.
pub fn load_scripted(path: &str, src: &str) -> (Vec<Resource>, Diagnostics) {
    let mut diags = Diagnostics::new();

    let registry: Rc<RefCell<Vec<RawRecord>>> = Rc::new(RefCell::new(Vec::new()));
    let engine = build_engine(&registry);

    if let Err(err) = engine.run(src) {
        diags.push(Diagnostic::error(format!(
            "{}: script execution failed: {}",
            path, err
        )));
        return (Vec::new(), diags);
    }
    drop(engine);

    let records = registry.take();
    let mut resources = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match extract_record(record) {
            Ok(resource) => resources.push(resource),
            Err(msg) => {
                diags.push(Diagnostic::error(format!(
                    "{}: registration {}: {}",
                    path,
                    index + 1,
                    msg
                )));
                // All-or-nothing: one bad record invalidates the file.
                return (Vec::new(), diags);
            }
        }
    }

    (resources, diags)
}

/// Read a scripted-syntax file from disk and load it.
///
/// A read failure is surfaced as an error diagnostic with no source range.
pub fn load_script_file(path: &Path) -> (Vec<Resource>, Diagnostics) {
    let src = match std::fs::read_to_string(path) {
        Ok(src) => src,
        Err(err) => {
            let mut diags = Diagnostics::new();
            diags.push(Diagnostic::error(format!(
                "failed to read {}: {}",
                path.display(),
                err
            )));
            return (Vec::new(), diags);
        }
    };
    load_scripted(&path.display().to_string(), &src)
}

/// Build a fresh engine exposing only the `register` primitive.
///
/// Module resolution is disabled, so `import` cannot reach the filesystem;
/// the registration overloads below are the entire host surface. Arguments
/// are taken as `Dynamic` so that harvest never fails — field validation
/// happens in [`extract_record`], after the script has run to completion.
fn build_engine(registry: &Rc<RefCell<Vec<RawRecord>>>) -> Engine {
    let mut engine = Engine::new();
    engine.set_module_resolver(rhai::module_resolvers::DummyModuleResolver::new());

    let sink = Rc::clone(registry);
    engine.register_fn("register", move |type_: Dynamic, name: Dynamic| {
        sink.borrow_mut().push(RawRecord {
            type_,
            name,
            params: None,
            deps: None,
        });
    });

    let sink = Rc::clone(registry);
    engine.register_fn(
        "register",
        move |type_: Dynamic, name: Dynamic, params: Dynamic| {
            sink.borrow_mut().push(RawRecord {
                type_,
                name,
                params: Some(params),
                deps: None,
            });
        },
    );

    let sink = Rc::clone(registry);
    engine.register_fn(
        "register",
        move |type_: Dynamic, name: Dynamic, params: Dynamic, deps: Dynamic| {
            sink.borrow_mut().push(RawRecord {
                type_,
                name,
                params: Some(params),
                deps: Some(deps),
            });
        },
    );

    engine
}

/// Coerce a scalar script value to its string form.
///
/// Strings, ints, floats, bools, and chars all coerce; structured values
/// (maps, arrays, function pointers) do not.
fn coerce_scalar(value: &Dynamic) -> Option<String> {
    if value.is::<ImmutableString>()
        || value.is::<rhai::INT>()
        || value.is::<rhai::FLOAT>()
        || value.is::<bool>()
        || value.is::<char>()
    {
        Some(value.to_string())
    } else {
        None
    }
}

/// Validate and convert one raw record into a canonical resource.
fn extract_record(record: &RawRecord) -> Result<Resource, String> {
    let type_ = coerce_scalar(&record.type_).ok_or_else(|| {
        format!(
            "resource type must be a string-convertible scalar, got {}",
            record.type_.type_name()
        )
    })?;
    let name = coerce_scalar(&record.name).ok_or_else(|| {
        format!(
            "resource name must be a string-convertible scalar, got {}",
            record.name.type_name()
        )
    })?;

    let mut params: IndexMap<String, String> = IndexMap::new();
    if let Some(raw) = &record.params {
        let map = raw.clone().try_cast::<Map>().ok_or_else(|| {
            format!("params must be a map, got {}", raw.type_name())
        })?;
        for (key, value) in &map {
            let coerced = coerce_scalar(value).ok_or_else(|| {
                format!(
                    "parameter '{}' has a non-convertible value of type {}",
                    key,
                    value.type_name()
                )
            })?;
            params.insert(key.to_string(), coerced);
        }
    }

    let mut deps: Vec<String> = Vec::new();
    if let Some(raw) = &record.deps {
        let list = raw.clone().try_cast::<Array>().ok_or_else(|| {
            format!("deps must be a list, got {}", raw.type_name())
        })?;
        for (position, value) in list.iter().enumerate() {
            let coerced = coerce_scalar(value).ok_or_else(|| {
                format!(
                    "dependency {} has a non-convertible value of type {}",
                    position + 1,
                    value.type_name()
                )
            })?;
            deps.push(coerced);
        }
    }

    Ok(normalize(&type_, &name, &params, &deps))
}
