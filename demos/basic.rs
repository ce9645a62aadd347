//! Building errata up the call stack and inspecting them at the top.
//!
//! Each layer pushes its own annotations, nests what it got from below, and
//! the caller decides from the aggregate severity what to do.

use errata::prelude::*;

fn read_block(index: u32) -> Rv<Vec<u8>> {
    let mut rv = Rv::new(vec![0; 16]);
    note!(rv, Severity::Diag, "read block {index}");
    if index == 2 {
        note!(rv, Severity::Warn, "checksum mismatch in block {index}, retried");
    }
    rv
}

fn load_index(blocks: u32) -> Rv<usize> {
    let mut total = Rv::new(0);
    total.info(format_args!("loading {blocks} blocks"));

    for index in 0..blocks {
        let (data, errata) = read_block(index).into_parts();
        *total += data.len();
        total.errata_mut().absorb(errata);
    }
    total
}

fn open_database(path: &str) -> Rv<usize> {
    let mut rv = Rv::new(0);
    rv.info(format_args!("opening {path}"));
    rv.errata_mut().nest();

    let (size, errata) = load_index(4).into_parts();
    rv.set(size);
    rv.errata_mut().absorb(errata);
    let size = *rv;
    if size < 128 {
        rv.errata_mut().set_nesting_level(0);
        rv.error(format_args!("index of {path} is too small ({size} bytes)"));
    }
    rv
}

fn main() {
    let mut rv = open_database("/var/lib/inventory.db");

    println!("index size: {}", *rv);
    println!("severity:   {}", rv.severity());
    println!("ok:         {}", rv.is_ok());
    println!();
    println!("annotations, newest first:");
    println!("{}", rv.errata());

    println!();
    println!("failures only:");
    for annotation in rv.errata().iter().filter(|annotation| annotation.is_failure()) {
        println!("  {}", annotation.text());
    }

    // Everything has been looked at
    rv.clear();
}
