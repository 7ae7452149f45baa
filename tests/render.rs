#![cfg(feature = "serde")]

use fae::{value, Template};

#[test]
fn render_static() {
    let result = Template::compile("Expressionless :|")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "Expressionless :|");
}

#[test]
fn render_default_template() {
    let result = Template::default().render(value! { soup: 123 }).unwrap();
    assert_eq!(result, "");
}

#[test]
fn render_substitute_integer() {
    let result = Template::compile("someVal: $(someVal)")
        .unwrap()
        .render(value! { someVal: 123 })
        .unwrap();
    assert_eq!(result, "someVal: 123");
}

#[test]
fn render_substitute_bool() {
    let result = Template::compile("someVal: $(someVal)")
        .unwrap()
        .render(value! { someVal: true })
        .unwrap();
    assert_eq!(result, "someVal: true");
}

#[test]
fn render_substitute_float() {
    let result = Template::compile("someVal: $(someVal)")
        .unwrap()
        .render(value! { someVal: 1.5 })
        .unwrap();
    assert_eq!(result, "someVal: 1.5");
}

#[test]
fn render_substitute_string() {
    let result = Template::compile("someVal: $(someVal)")
        .unwrap()
        .render(value! { someVal: "indeed" })
        .unwrap();
    assert_eq!(result, "someVal: indeed");
}

#[test]
fn render_substitute_missing() {
    let result = Template::compile("someVal: $(someVal)")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "someVal: ");
}

#[test]
fn render_substitute_list_is_empty() {
    // Containers have no textual form.
    let result = Template::compile("xs: $(xs)")
        .unwrap()
        .render(value! { xs: [1, 2, 3] })
        .unwrap();
    assert_eq!(result, "xs: ");
}

#[test]
fn render_escaped_command() {
    let template = Template::compile(r"\$(val)").unwrap();
    let result = template.render(value! { val: 5 }).unwrap();
    assert_eq!(result, "$(val)");
}

#[test]
fn render_escaped_escape() {
    let template = Template::compile(r"\\$(val)").unwrap();
    let result = template.render(value! { val: 5 }).unwrap();
    assert_eq!(result, r"\5");
}

#[test]
fn render_backslash_before_escaped_escape() {
    let template = Template::compile(r"\\\$(val)").unwrap();
    let result = template.render(value! { val: 5 }).unwrap();
    assert_eq!(result, r"\\5");
}

#[test]
fn render_escaped_command_after_text() {
    let template = Template::compile(r"2+3=\$(val)").unwrap();
    let result = template.render(value! { val: 5 }).unwrap();
    assert_eq!(result, "2+3=$(val)");
}

#[test]
fn render_escaped_escape_after_text() {
    let template = Template::compile(r"2+3=\\$(val)").unwrap();
    let result = template.render(value! { val: 5 }).unwrap();
    assert_eq!(result, r"2+3=\5");
}

#[test]
fn render_backslash_before_escaped_escape_after_text() {
    let template = Template::compile(r"2+3=\\\$(val)").unwrap();
    let result = template.render(value! { val: 5 }).unwrap();
    assert_eq!(result, r"2+3=\\5");
}

#[test]
fn render_if_missing_name() {
    let result = Template::compile("$(if iDontExist)found$(end)")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "");
}

#[test]
fn render_if_tests_presence_not_truthiness() {
    let template = Template::compile("$(if v)found$(end)").unwrap();
    let bindings = [
        value! { v: true },
        value! { v: false },
        value! { v: 0 },
        value! { v: 5 },
        value! { v: "" },
        value! { v: "full" },
    ];
    for globals in &bindings {
        assert_eq!(template.render_from(globals).unwrap(), "found");
    }
}

#[test]
fn render_if_nested() {
    let template = Template::compile("$(if a)x$(if b)y$(end)z$(end)").unwrap();
    assert_eq!(template.render(value! { a: 1, b: 2 }).unwrap(), "xyz");
    assert_eq!(template.render(value! { a: 1 }).unwrap(), "xz");
    assert_eq!(template.render(value! { b: 2 }).unwrap(), "");
}

#[test]
fn render_for_list() {
    let result = Template::compile("$(for n in collection)$(n)$(end)")
        .unwrap()
        .render(value! { collection: [1, 2, 3, 4, 5] })
        .unwrap();
    assert_eq!(result, "12345");
}

#[test]
fn render_for_empty_list() {
    let result = Template::compile("$(for n in collection)$(n)$(end)")
        .unwrap()
        .render(value! { collection: [] })
        .unwrap();
    assert_eq!(result, "");
}

#[test]
fn render_for_missing_container() {
    let result = Template::compile("$(for n in collection)$(n)$(end)")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "");
}

#[test]
fn render_for_non_iterable_container() {
    let result = Template::compile("$(for n in collection)$(n)$(end)")
        .unwrap()
        .render(value! { collection: 123 })
        .unwrap();
    assert_eq!(result, "");
}

#[test]
fn render_for_item_shadows_binding() {
    let template = Template::compile("$(for n in xs)$(n)$(end)-$(n)").unwrap();
    let result = template.render(value! { n: "outer", xs: [1, 2] }).unwrap();
    assert_eq!(result, "12-outer");
}

#[test]
fn render_for_item_not_visible_after_loop() {
    let template = Template::compile("$(for n in xs)$(n)$(end)$(n)").unwrap();
    let result = template.render(value! { xs: [1, 2] }).unwrap();
    assert_eq!(result, "12");
}

#[test]
fn render_for_item_exists_inside_loop() {
    let template = Template::compile("$(for n in xs)$(if n)y$(end)$(end)").unwrap();
    let result = template.render(value! { xs: [1] }).unwrap();
    assert_eq!(result, "y");
}

#[test]
fn render_for_nested() {
    let template = Template::compile("$(for a in xs)$(for b in ys)$(a)$(b) $(end)$(end)").unwrap();
    let result = template
        .render(value! { xs: [1, 2], ys: [8, 9] })
        .unwrap();
    assert_eq!(result, "18 19 28 29 ");
}

#[test]
fn render_for_list_of_strings() {
    let template = Template::compile("$(for name in names)$(name), $(end)").unwrap();
    let result = template
        .render(value! { names: ["lorem", "ipsum"] })
        .unwrap();
    assert_eq!(result, "lorem, ipsum, ");
}

#[test]
fn render_standalone_include_is_empty() {
    let result = Template::compile("a$(include other.txt)b")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "ab");
}

#[test]
fn render_is_deterministic() {
    let template = Template::compile("$(for n in xs)$(n)$(end) $(if a)x$(end) $(b)").unwrap();
    let globals = value! { xs: [1, 2, 3], a: true, b: "done" };
    let first = template.render_from(&globals).unwrap();
    let second = template.render_from(&globals).unwrap();
    assert_eq!(first, second);
}

#[test]
fn render_empty_bindings_never_fail() {
    let template =
        Template::compile("$(a) $(if b)x$(end) $(for n in xs)$(n)$(end) $(include t.txt)").unwrap();
    assert_eq!(template.render(value! {}).unwrap(), "   ");
}

#[test]
fn render_derived_context() {
    #[derive(serde::Serialize)]
    struct Context {
        user: User,
        tags: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct User {
        name: String,
    }

    let ctx = Context {
        user: User {
            name: "John Smith".into(),
        },
        tags: vec!["a".into(), "b".into()],
    };

    // Identifiers have no dots, so nested fields are not addressable; only
    // top-level names resolve.
    let result = Template::compile("tags:$(for t in tags) $(t)$(end)")
        .unwrap()
        .render(&ctx)
        .unwrap();
    assert_eq!(result, "tags: a b");
}

#[test]
fn render_template_source_roundtrip() {
    let source = "lorem ipsum\n\tdolor  sit amet\n";
    let template = Template::compile(source).unwrap();
    assert_eq!(template.source(), source);
    assert_eq!(template.render(value! {}).unwrap(), source);
}
