//! Dispatch, binding and inheritance through the built-in components.

use lwc::prelude::*;
use lwc::registry::RegistryProperty;
use lwc::BindError;

fn registry() -> Registry {
    lwc::initialize(RegistryConfig::new()).expect("initialize")
}

fn geometry(registry: &mut Registry, handle: ObjectHandle) -> [i64; 4] {
    ["getX", "getY", "getWidth", "getHeight"].map(|getter| {
        registry
            .call(handle, getter, &[])
            .ok()
            .and_then(|v| v.as_int())
            .unwrap_or_else(|| panic!("{} did not return an int", getter))
    })
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_builtin_types_are_sorted() {
    let registry = registry();
    assert_eq!(registry.num_types(), 6);
    assert_eq!(registry.type_name(0), Some("pytest.ObjectList"));
    assert_eq!(registry.type_name(5), Some("test.DoubleBox"));
    assert_eq!(registry.type_name(6), None);
    assert!(registry.has_type("pytest.ObjectList2"));
    assert!(!registry.has_type("luatest.Dict"));
    assert_eq!(registry.module_names(), ["pytest", "test", "rbtest"]);
}

#[test]
fn test_method_listing_renders_descriptors() {
    let registry = registry();
    let listing = registry.methods("pytest.ObjectList").unwrap().to_string();
    assert!(listing.contains("at([in] int idx, [return] object)"), "{}", listing);
    assert!(
        listing.contains("printInt([in] int value, [in] string indent = \"\")"),
        "{}",
        listing
    );
}

#[test]
fn test_doc_string_lists_inherited_operations() {
    let registry = registry();
    let doc = registry.doc_string("pytest.ObjectList2", "").unwrap();
    assert!(doc.contains("pytest.ObjectList"), "{}", doc);
    assert!(doc.contains("clear"), "{}", doc);
    assert!(doc.contains("printInt"), "{}", doc);
    assert!(registry.doc_string("nope", "").is_none());
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_double_box_overrides_setters() {
    let mut registry = registry();
    let obj = registry.create("test.DoubleBox").unwrap();
    assert_eq!(geometry(&mut registry, obj), [0, 0, 1, 1]);

    registry.call(obj, "setX", &[Dynamic::Int(10)]).unwrap();
    registry.call(obj, "setY", &[Dynamic::Int(2)]).unwrap();
    registry.call(obj, "setWidth", &[Dynamic::Int(300)]).unwrap();
    registry.call(obj, "setHeight", &[Dynamic::Int(150)]).unwrap();
    assert_eq!(geometry(&mut registry, obj), [20, 4, 600, 300]);

    let plain = registry.create("test.Box").unwrap();
    registry.call(plain, "setX", &[Dynamic::Int(10)]).unwrap();
    assert_eq!(geometry(&mut registry, plain)[0], 10);
}

#[test]
fn test_to_box_copies_geometry() {
    let mut registry = registry();
    let obj = registry.create("test.DoubleBox").unwrap();
    registry.call(obj, "setWidth", &[Dynamic::Int(4)]).unwrap();

    let copy = registry.call(obj, "toBox", &[]).unwrap().as_object().unwrap();
    assert_eq!(registry.type_name_of(copy), Some("test.Box"));
    assert_eq!(geometry(&mut registry, copy), [0, 0, 8, 1]);

    registry.call(copy, "setWidth", &[Dynamic::Int(4)]).unwrap();
    assert_eq!(geometry(&mut registry, copy)[2], 4);
    assert_eq!(geometry(&mut registry, obj)[2], 8);

    registry.destroy(obj).unwrap();
    registry.destroy(copy).unwrap();
    assert_eq!(registry.live_instances(), 0);
}

#[test]
fn test_point2_dot_uses_out_parameter() {
    let mut registry = registry();
    let a = registry.create("rbtest.Point2").unwrap();
    let b = registry.create("rbtest.Point").unwrap();
    registry.call(a, "set", &[Dynamic::Int(2), Dynamic::Int(3)]).unwrap();
    registry
        .invoke(b, "set", &[], &[("y", Dynamic::Int(4)), ("x", Dynamic::Int(-1))])
        .unwrap();

    let result = registry.invoke(a, "dot", &[b.into()], &[]).unwrap();
    assert!(result.value.is_void());
    assert_eq!(result.outs, vec![Dynamic::Float(10.0)]);
    assert_eq!(result.into_value(), Dynamic::Float(10.0));
    assert!(matches!(
        registry.call(b, "dot", &[a.into()]),
        Err(DispatchError::UnknownOperation { .. })
    ));
}

#[test]
fn test_wrong_receiver_type_is_reported() {
    let mut registry = registry();
    let point = registry.create("rbtest.Point2").unwrap();
    let other = registry.create("test.Box").unwrap();
    let err = registry.call(point, "dot", &[other.into()]).unwrap_err();
    assert!(err.native().is_some(), "{:?}", err);
}

// =============================================================================
// Binding
// =============================================================================

#[test]
fn test_missing_argument() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    let err = registry.call(list, "at", &[]).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Binding(BindError::MissingArgument { ref parameter, .. }) if parameter == "idx"
    ));
}

#[test]
fn test_unknown_and_duplicate_keywords() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    assert!(matches!(
        registry.invoke(list, "printInt", &[Dynamic::Int(1)], &[("prefix", "> ".into())]),
        Err(DispatchError::Binding(BindError::UnknownKeyword { .. }))
    ));
    assert!(matches!(
        registry.invoke(list, "printInt", &[Dynamic::Int(1)], &[("value", Dynamic::Int(2))]),
        Err(DispatchError::Binding(BindError::DuplicateKeyword { .. }))
    ));
}

#[test]
fn test_too_many_arguments() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    assert!(matches!(
        registry.call(list, "size", &[Dynamic::Int(1)]),
        Err(DispatchError::Binding(BindError::TooManyArguments { expected: 0, got: 1, .. }))
    ));
}

#[test]
fn test_type_mismatch() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    let err = registry.call(list, "at", &["zero".into()]).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Binding(BindError::TypeMismatch { index: 0, actual: "string", .. })
    ));
    assert_eq!(registry.call(list, "size", &[]).unwrap(), Dynamic::Int(0));
}

#[test]
fn test_implicit_conversions_follow_config() {
    let mut registry = registry();
    let point = registry.create("rbtest.Point").unwrap();
    registry.call(point, "setX", &[Dynamic::Float(3.9)]).unwrap();
    assert_eq!(registry.call(point, "getX", &[]).unwrap(), Dynamic::Int(3));

    let config = RegistryConfig::new().with_property(RegistryProperty::AllowImplicitConversions, 0);
    let mut strict = lwc::initialize(config).unwrap();
    let point = strict.create("rbtest.Point").unwrap();
    assert!(matches!(
        strict.call(point, "setX", &[Dynamic::Float(3.0)]),
        Err(DispatchError::Binding(BindError::TypeMismatch { .. }))
    ));
}

#[test]
fn test_null_object_is_a_list_element() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    let item = registry.create("test.Box").unwrap();

    registry.call(list, "push", &[Dynamic::NullHandle]).unwrap();
    assert_eq!(registry.call(list, "size", &[]).unwrap(), Dynamic::Int(1));
    assert_eq!(registry.call(list, "at", &[Dynamic::Int(0)]).unwrap(), Dynamic::NullHandle);

    registry.call(list, "push", &[item.into()]).unwrap();
    registry
        .call(list, "set", &[Dynamic::Int(1), Dynamic::NullHandle])
        .unwrap();
    registry.call(list, "set", &[Dynamic::Int(0), item.into()]).unwrap();
    assert_eq!(registry.call(list, "first", &[]).unwrap(), Dynamic::Object(item));
    assert!(registry.call(list, "last", &[]).unwrap().is_null());
    assert_eq!(registry.call(list, "size", &[]).unwrap(), Dynamic::Int(2));
}

#[test]
fn test_non_object_argument_is_rejected_before_component() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    assert!(matches!(
        registry.call(list, "push", &[Dynamic::Int(3)]),
        Err(DispatchError::Binding(BindError::TypeMismatch { actual: "int", .. }))
    ));
    assert_eq!(registry.call(list, "size", &[]).unwrap(), Dynamic::Int(0));
}

// =============================================================================
// Invalid calls
// =============================================================================

#[test]
fn test_unknown_operation_on_box() {
    let mut registry = registry();
    let obj = registry.create("test.Box").unwrap();
    let err = registry
        .invoke(
            obj,
            "set",
            &[Dynamic::Array(vec![Dynamic::Int(2), Dynamic::Int(2)])],
            &[("scale", Dynamic::Int(3))],
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "type \"test.Box\" has no method \"set\"");
}

#[test]
fn test_destroyed_instance_is_invalid() {
    let mut registry = registry();
    let list = registry.create("pytest.ObjectList").unwrap();
    registry.destroy(list).unwrap();
    assert!(matches!(
        registry.call(list, "size", &[]),
        Err(DispatchError::InvalidInstance { .. })
    ));
    assert!(matches!(
        registry.destroy(list),
        Err(DispatchError::InvalidInstance { .. })
    ));

    let fresh = registry.create("pytest.ObjectList").unwrap();
    assert_eq!(fresh.index, list.index);
    assert!(registry.call(list, "size", &[]).is_err());
    assert_eq!(registry.call(fresh, "size", &[]).unwrap(), Dynamic::Int(0));
}

#[test]
fn test_unknown_type() {
    let mut registry = registry();
    assert!(matches!(
        registry.create("luatest.Dict"),
        Err(DispatchError::UnknownType(name)) if name == "luatest.Dict"
    ));
}
