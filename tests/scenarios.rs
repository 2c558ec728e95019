use std::ptr;

use tinyopt::{
    Auto, EmptyAccess, EmptyValue, EmptyVia, Field, Fields, Optional, Selected,
    Sentinel,
};

fn init() {
    #[cfg(feature = "logger")]
    let _ = env_logger::builder()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[derive(Fields, Debug, PartialEq)]
struct Account {
    /// Never negative for real accounts
    id: i32,
    balance: f64,
}

type ById = Field<account_fields::id, Sentinel<-1>>;
type ByBalance = Field<account_fields::balance>;

#[test]
fn pointer_with_null_sentinel() {
    init();
    type Ptr = Optional<*const u32>;
    assert_eq!(Ptr::SELECTED, Selected::Registered);
    assert_eq!(size_of::<Ptr>(), size_of::<*const u32>());

    let x = 1u32;
    let mut p = Ptr::new();
    assert!(p.is_empty());
    p.emplace(&x);
    assert_eq!(p.value().copied(), Ok(&x as *const u32));
    p.reset();
    assert!(p.is_empty());
}

#[test]
fn pointer_with_non_null_sentinel() {
    type Ptr = Optional<*const u32, Sentinel<{ usize::MAX as i128 }>>;
    assert_eq!(Ptr::SELECTED, Selected::Sentinel);
    assert_eq!(size_of::<Ptr>(), size_of::<*const u32>());

    let p = Ptr::some(ptr::null());
    assert!(p.has_value());
    assert!(p.value().is_ok_and(|p| p.is_null()));
}

#[test]
fn int_without_sentinel_is_separate() {
    type Int = Optional<i32>;
    assert_eq!(Int::SELECTED, Selected::Separate);
    assert!(!Int::IN_PLACE);
    assert_eq!(size_of::<Int>(), size_of::<(i32, bool)>());

    for value in [i32::MIN, -1, 0, 42, i32::MAX] {
        let x = Int::some(value);
        assert_eq!(x.value(), Ok(&value));
    }
}

#[test]
fn int_with_sentinel() {
    type Int = Optional<i32, Sentinel<42>>;
    assert_eq!(Int::SELECTED, Selected::Sentinel);
    assert_eq!(size_of::<Int>(), size_of::<i32>());

    let mut x = Int::new();
    assert!(x.is_empty());
    x.emplace(7);
    assert_eq!(x.value(), Ok(&7));
    x.reset();
    assert!(x.is_empty());
    assert_eq!(x.value(), Err(EmptyAccess));
}

#[test]
fn sentinel_at_type_boundaries() {
    let x = Optional::<u8, Sentinel<0>>::some(255);
    assert_eq!(x.value(), Ok(&255));
    let x = Optional::<u8, Sentinel<255>>::some(0);
    assert_eq!(x.value(), Ok(&0));
    let x = Optional::<i16, Sentinel<{ i16::MIN as i128 }>>::some(i16::MAX);
    assert_eq!(x.value(), Ok(&i16::MAX));
    let x = Optional::<i16, Sentinel<{ i16::MAX as i128 }>>::new();
    assert!(x.is_empty());
}

#[test]
fn field_sentinel() {
    init();
    type MaybeAccount = Optional<Account, ById>;
    assert_eq!(MaybeAccount::SELECTED, Selected::FieldSentinel);
    assert_eq!(size_of::<MaybeAccount>(), size_of::<Account>());

    let mut x = MaybeAccount::new();
    assert!(x.is_empty());

    x.emplace(Account {
        id: 7,
        balance: 10.0,
    });
    assert_eq!(x.value().map(|a| a.balance), Ok(10.0));

    if let Ok(account) = x.value_mut() {
        account.balance = f64::NAN;
    }
    assert!(x.has_value());

    x.reset();
    assert!(x.is_empty());
}

#[test]
fn field_with_registered_manipulator() {
    type MaybeAccount = Optional<Account, ByBalance>;
    assert_eq!(MaybeAccount::SELECTED, Selected::Field);
    assert_eq!(size_of::<MaybeAccount>(), size_of::<Account>());

    let x = MaybeAccount::some(Account {
        id: -1,
        balance: f64::NAN,
    });
    assert!(x.has_value());
    assert_eq!(x.value().map(|a| a.id), Ok(-1));
}

#[test]
fn float_exploits_unused_nan() {
    type Float = Optional<f64>;
    assert_eq!(Float::SELECTED, Selected::Registered);
    assert_eq!(size_of::<Float>(), size_of::<f64>());

    let mut x = Float::new();
    assert!(x.is_empty());

    x.emplace(f64::NAN);
    assert!(x.has_value());
    assert!(x.value().is_ok_and(|v| v.is_nan()));

    // A NaN produced by arithmetic rather than the constant
    let zero = std::hint::black_box(0.0f64);
    let computed = zero / zero;
    assert!(computed.is_nan());
    x.emplace(computed);
    assert!(x.has_value());
    assert_eq!(x.value().map(|v| v.to_bits()), Ok(computed.to_bits()));

    x.emplace(-0.0);
    assert_eq!(x.value().map(|v| v.to_bits()), Ok((-0.0f64).to_bits()));
}

struct NoName;

impl EmptyValue<String> for NoName {
    const VALUE: String = String::new();
}

#[test]
fn sentinel_supplied_by_type() {
    type Name = Optional<String, EmptyVia<NoName>>;
    assert_eq!(Name::SELECTED, Selected::Sentinel);
    assert_eq!(size_of::<Name>(), size_of::<String>());

    let mut x = Name::new();
    assert!(x.is_empty());
    x.emplace("alice".into());
    assert_eq!(x.value().map(String::as_str), Ok("alice"));
    x.set("bob".into());
    assert_eq!(x.take().as_deref(), Some("bob"));
    assert!(x.is_empty());
}

#[test]
fn explicit_auto_matches_default() {
    assert_eq!(
        Optional::<f32, Auto>::SELECTED,
        Optional::<f32>::SELECTED
    );
}

#[test]
fn equal_payloads_compare_equal() {
    let a = Optional::<Account, ById>::some(Account {
        id: 1,
        balance: 2.0,
    });
    let b = Optional::<Account, ById>::from(Some(Account {
        id: 1,
        balance: 2.0,
    }));
    assert_eq!(a, b);
    assert_eq!(a.into_option(), b.into_option());
}
