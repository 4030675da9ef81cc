use super::*;
use crate::data::model::DataStore;

struct Fixture {
    store: DataStore,
    filters: FilterRegistry,
}

impl Fixture {
    fn new() -> Self {
        let mut store = DataStore::from_json(serde_json::json!({
            "radius": 8.7,
            "color_name": "color",
            "color_value": "#b464ff",
            "num_trolls": 1,
            "num_multi": ["left", "right"],
        }))
        .unwrap();
        store.clear_dirty();

        let mut filters = FilterRegistry::with_builtins();
        filters
            .register("concatenate", |args| {
                let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
                Variant::String(parts.join(","))
            })
            .unwrap();
        filters
            .register("number_suffix", |args| {
                let [n, one, many] = args else {
                    return Variant::Empty;
                };
                let suffix = if n.to_f64() == 1.0 { one } else { many };
                Variant::String(format!("{n} {suffix}"))
            })
            .unwrap();

        Self { store, filters }
    }

    fn eval(&mut self, src: &str) -> String {
        let e = DataExpression::parse(src, ParseMode::Expression, &self.filters)
            .unwrap_or_else(|err| panic!("{src}: {err}"));
        e.try_run(&mut self.store, &self.filters)
            .unwrap_or_else(|err| panic!("{src}: {err}"))
            .to_string()
    }

    fn assign(&mut self, src: &str) {
        let e = DataExpression::parse(src, ParseMode::Assignment, &self.filters)
            .unwrap_or_else(|err| panic!("{src}: {err}"));
        e.try_run(&mut self.store, &self.filters)
            .unwrap_or_else(|err| panic!("{src}: {err}"));
    }
}

#[test]
fn operators_and_literals() {
    let mut f = Fixture::new();
    assert_eq!(f.eval("'a' | to_upper"), "A");
    assert_eq!(f.eval("!!10 - 1 ? 'hello' : 'world' | to_upper"), "WORLD");
    assert_eq!(f.eval("true == false"), "0");
    assert_eq!(f.eval("true != false"), "1");
    assert_eq!(f.eval("true"), "1");
    let src = "true || false ? true && 3==1+2 ? 'Absolutely!' : 'well..' : 'no'";
    assert_eq!(f.eval(src), "Absolutely!");
    assert_eq!(f.eval(r"'It\'s a fit'"), "It's a fit");
    assert_eq!(f.eval("2 * 2"), "4");
    assert_eq!(f.eval("50000 / 1500"), "33.333");
    assert_eq!(f.eval("5*1+2"), "7");
    assert_eq!(f.eval("5*(1+2)"), "15");
    assert_eq!(f.eval("2*(-2)/4"), "-1");
    assert_eq!(f.eval("5.2 + 19 + 'px'"), "24.2px");
    assert_eq!(f.eval("5 == 1 + 2*2 || 8 == 1 + 4  ? 'yes' : 'no'"), "yes");
    assert_eq!(f.eval("!!('fa' + 'lse')"), "0");
    assert_eq!(f.eval("!!('tr' + 'ue')"), "1");
    assert_eq!(
        f.eval("'fox' + 'dog' ? 'FoxyDog' : 'hot' + 'dog' | to_upper"),
        "HOTDOG"
    );
}

#[test]
fn variables_and_string_concatenation() {
    let mut f = Fixture::new();
    assert_eq!(
        f.eval("(color_name) + (': ' + color_value)"),
        "color: #b464ff"
    );
    assert_eq!(f.eval("(radius | format(2)) + 'm'"), "8.70m");
    assert_eq!(f.eval("num_multi.size"), "2");
}

#[test]
fn format_and_rounding() {
    let mut f = Fixture::new();
    assert_eq!(f.eval("3.62345 | round"), "4");
    assert_eq!(f.eval("3.62345 | format(0)"), "4");
    assert_eq!(f.eval("3.62345 | format(2)"), "3.62");
    assert_eq!(f.eval("3.62345 | format(10)"), "3.6234500000");
    assert_eq!(f.eval("3.62345 | format(10, true)"), "3.62345");
    assert_eq!(f.eval("3.62345 | round | format(2)"), "4.00");
    assert_eq!(f.eval("3.0001 | format(2, false)"), "3.00");
    assert_eq!(f.eval("3.0001 | format(2, true)"), "3");
    assert_eq!(f.eval("format(3.0001, 2, true)"), "3");
    assert_eq!(f.eval("0.2 + 3.42345 | round"), "4");
    assert_eq!(f.eval("(3.42345 | round) + 0.2"), "3.2");
    // format yields a string, so `+` concatenates.
    assert_eq!(f.eval("(3.42345 | format(0)) + 0.2"), "30.2");
}

#[test]
fn custom_filters_and_call_syntax() {
    let mut f = Fixture::new();
    let src = "'hello world' | to_upper | concatenate(5 + 12 == 17 ? 'yes' : 'no', 9*2)";
    assert_eq!(f.eval(src), "HELLO WORLD,yes,18");
    assert_eq!(f.eval("'Hi' | concatenate"), "Hi");
    assert_eq!(f.eval("'Hi' | concatenate('there')"), "Hi,there");
    assert_eq!(f.eval("'A' | concatenate('b','c', 'd','e')"), "A,b,c,d,e");
    assert_eq!(f.eval("3.6 | concatenate"), "3.6");
    assert_eq!(f.eval("concatenate()"), "");
    assert_eq!(f.eval("concatenate( 'Hi',  'there' )"), "Hi,there");
    assert_eq!(f.eval("concatenate('A', 'b'+'c', 'd','e')"), "A,bc,d,e");
    assert_eq!(f.eval("concatenate(3.6+1)"), "4.6");
    assert_eq!(
        f.eval("concatenate(3.6+1) | round | format(3, false)"),
        "5.000"
    );
    assert_eq!(f.eval("concatenate(3.6+1 | round, 'x')"), "5,x");
    assert_eq!(
        f.eval("num_trolls | number_suffix('troll','trolls')"),
        "1 troll"
    );
}

#[test]
fn assignments_mutate_the_model() {
    let mut f = Fixture::new();
    assert_eq!(f.eval("radius < 10.5 ? 'smaller' : 'larger'"), "smaller");
    f.assign("radius = 15");
    assert_eq!(f.eval("radius < 10.5 ? 'smaller' : 'larger'"), "larger");
    assert!(f.store.is_variable_dirty("radius"));

    f.assign("radius = 4; color_name = 'image-color'");
    assert_eq!(f.eval("radius == 4 && color_name == 'image-color'"), "1");
    assert_eq!(f.eval("concatenate('r', 2*radius)"), "r,8");

    f.assign("color_name = 'a' | concatenate('b')");
    assert_eq!(f.eval("color_name"), "a,b");
    f.assign("color_name = concatenate('c','d')");
    assert_eq!(f.eval("color_name"), "c,d");
}

#[test]
fn dirty_tracking_follows_read_variables() {
    let mut f = Fixture::new();
    let src = concat!(
        "concatenate('It takes', num_trolls*3 + ' goats', ",
        "'to outsmart', num_trolls | number_suffix('troll','trolls'))"
    );
    let e = DataExpression::parse(src, ParseMode::Expression, &f.filters).unwrap();
    assert_eq!(e.variable_names(), vec!["num_trolls"]);
    assert_eq!(e.addresses().len(), 1);
    assert_eq!(
        e.run(&mut f.store, &f.filters).to_string(),
        "It takes,3 goats,to outsmart,1 troll"
    );

    assert!(!e.is_dirty(&f.store));
    f.assign("num_trolls = 3");
    assert!(e.is_dirty(&f.store));
    assert_eq!(
        e.run(&mut f.store, &f.filters).to_string(),
        "It takes,9 goats,to outsmart,3 trolls"
    );
}

#[test]
fn only_the_taken_branch_runs() {
    let mut f = Fixture::new();
    assert_eq!(f.eval("true ? num_multi[0] : num_multi[999]"), "left");
    assert_eq!(f.eval("false ? num_multi[999] : num_multi[1]"), "right");
    assert_eq!(f.eval("false && num_multi[999]"), "0");
    assert_eq!(f.eval("true || num_multi[999]"), "1");
}

#[test]
fn runtime_errors_yield_empty() {
    let mut f = Fixture::new();
    let e = DataExpression::parse("missing + 1", ParseMode::Expression, &f.filters).unwrap();
    assert!(e.try_run(&mut f.store, &f.filters).is_err());
    assert_eq!(e.run(&mut f.store, &f.filters), Variant::Empty);
}

#[test]
fn parse_errors_carry_position() {
    let f = Fixture::new();
    let err = DataExpression::parse("1 + * 2", ParseMode::Expression, &f.filters).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("parse error:"), "{msg}");
    assert!(msg.contains("position 4"), "{msg}");
}

#[test]
fn event_calls_reach_the_model() {
    let mut f = Fixture::new();
    f.store
        .bind_event("reset", |vars, args| {
            let value = args.first().cloned().unwrap_or_default();
            vars.set(&DataAddress::root("radius"), value)?;
            Ok(())
        })
        .unwrap();
    f.assign("reset(2 + 3)");
    assert_eq!(f.eval("radius"), "5");
}
