//! Example that enumerates the H4 Coxeter group (symmetries of the 120-cell).
//! This is also useful as an imprecise benchmark.

use coxeter::KnownGroup;

fn main() {
    let before = std::time::Instant::now();
    let presentation = KnownGroup::H4.presentation().expect("bad presentation");
    let enumeration = presentation.solve(&[], None).expect("enumeration failed");
    let after = std::time::Instant::now();
    println!("order {} in {:?}", enumeration.order(), after - before);

    assert_eq!(enumeration.order(), 14400);
}
