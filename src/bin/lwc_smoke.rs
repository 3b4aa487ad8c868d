//! Smoke run of the built-in components.
//!
//! Exercises discovery, instance lifecycle and dispatch against the
//! `pytest`, `test` and `rbtest` modules and prints a transcript.

use std::path::PathBuf;

use clap::Parser;
use lwc::prelude::*;

#[derive(Parser)]
#[command(name = "lwc-smoke", version, about = "Run the built-in component scenarios")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory scanned for modules, in addition to LWC_MODULE_PATH (repeatable)
    #[arg(long = "module-path")]
    module_paths: Vec<PathBuf>,

    /// Number of points pushed in the point scenario
    #[arg(long, default_value_t = 11)]
    points: i64,
}

fn main() -> Result<(), LwcError> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("lwc", level)
        .filter_module("lwc_registry", level)
        .filter_module("lwc_modules", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let config = cli
        .module_paths
        .iter()
        .fold(RegistryConfig::from_env(), |config, path| config.with_module_path(path));

    println!("### Initialize");
    let mut registry = lwc::initialize(config)?;

    list_types(&registry);
    object_list(&mut registry)?;
    double_box(&mut registry)?;
    points(&mut registry, cli.points)?;

    println!("### Live instances: {}", registry.live_instances());
    Ok(())
}

fn list_types(registry: &Registry) {
    println!("### Available types");
    for name in registry.type_names() {
        println!("  {}", name);
    }
}

fn object_list(registry: &mut Registry) -> Result<(), LwcError> {
    const LIST: &str = "pytest.ObjectList2";

    println!("### Has type \"{}\"?", LIST);
    let Some(methods) = registry.methods(LIST) else {
        println!("false");
        return Ok(());
    };
    println!("true");
    print!("{}", methods);

    println!("### Create a {}", LIST);
    let list = registry.create(LIST)?;
    println!("{}", Dynamic::Object(list));
    println!("### Create a test.Box");
    let item = registry.create("test.Box")?;
    println!("{}", Dynamic::Object(item));

    println!("### Add box to list");
    registry.call(list, "push", &[item.into()])?;
    println!("{}", registry.call(list, "size", &[])?);

    println!("### Clear list");
    registry.call(list, "clear", &[])?;
    println!("{}", registry.call(list, "size", &[])?);

    println!("### Keyword arg test");
    registry.invoke(list, "printInt", &[Dynamic::Int(10)], &[("indent", "=> ".into())])?;

    println!("### Destroy box & list");
    registry.destroy(item)?;
    registry.destroy(list)?;
    Ok(())
}

fn print_geometry(registry: &mut Registry, handle: ObjectHandle) -> Result<(), LwcError> {
    for getter in ["getX", "getY", "getWidth", "getHeight"] {
        println!("{}", registry.call(handle, getter, &[])?);
    }
    Ok(())
}

fn double_box(registry: &mut Registry) -> Result<(), LwcError> {
    println!("### Create object test.DoubleBox");
    let obj = registry.create("test.DoubleBox")?;
    println!("{}", Dynamic::Object(obj));

    println!("### Check available methods");
    if let Some(methods) = registry.methods("test.DoubleBox") {
        for name in methods.names() {
            println!("{}", name);
        }
    }

    println!("### call getters");
    print_geometry(registry, obj)?;

    println!("### call setters");
    registry.call(obj, "setX", &[Dynamic::Int(10)])?;
    registry.call(obj, "setY", &[Dynamic::Int(2)])?;
    registry.call(obj, "setWidth", &[Dynamic::Int(300)])?;
    registry.call(obj, "setHeight", &[Dynamic::Int(150)])?;

    println!("### clone");
    let Some(copy) = registry.call(obj, "toBox", &[])?.as_object() else {
        println!("*** FAILED: toBox returned no object");
        registry.destroy(obj)?;
        return Ok(());
    };

    println!("### call getters on Box");
    print_geometry(registry, copy)?;

    println!("### call Box.set");
    let scaled = registry.invoke(
        copy,
        "set",
        &[Dynamic::Array(vec![Dynamic::Int(2), Dynamic::Int(2)])],
        &[("scale", Dynamic::Int(3)), ("normalize", true.into())],
    );
    match scaled {
        Ok(_) => println!(
            "{}, {}",
            registry.call(copy, "getX", &[])?,
            registry.call(copy, "getY", &[])?
        ),
        Err(err) => println!("*** FAILED: {}", err),
    }

    println!("### Destroy objects");
    registry.destroy(obj)?;
    registry.destroy(copy)?;
    Ok(())
}

fn points(registry: &mut Registry, count: i64) -> Result<(), LwcError> {
    println!("### Points");
    let list = registry.create("pytest.ObjectList")?;
    for i in 0..count {
        let point = registry.create("rbtest.Point")?;
        registry.call(point, "set", &[i.into(), i.into()])?;
        registry.call(list, "push", &[point.into()])?;
    }

    let size = registry.call(list, "size", &[])?.as_int().unwrap_or_default();
    for i in 0..size {
        let Some(point) = registry.call(list, "at", &[i.into()])?.as_object() else {
            continue;
        };
        let x = registry.call(point, "getX", &[])?;
        let y = registry.call(point, "getY", &[])?;
        println!("Point{}: ({}, {})", i, x, y);
        registry.destroy(point)?;
    }

    registry.destroy(list)?;
    Ok(())
}
