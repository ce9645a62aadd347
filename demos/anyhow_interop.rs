//! Moving failures between errata and anyhow.

use anyhow::Context;
use errata::{
    Erratum, Rv,
    compat::{IntoErratum, anyhow1::IntoAnyhow},
};

fn parse_port(text: &str) -> anyhow::Result<u16> {
    let port = text
        .parse::<u16>()
        .with_context(|| format!("`{text}` is not a port number"))?;
    Ok(port)
}

fn configure(text: &str) -> Rv<u16> {
    let mut rv = Rv::new(8080);
    rv.info(format_args!("configuring port from `{text}`"));
    match parse_port(text).into_erratum() {
        Ok(port) => {
            rv.set(port);
        }
        Err(errata) => {
            rv.errata_mut().nest();
            rv.errata_mut().absorb(errata);
            rv.errata_mut().set_nesting_level(0);
            rv.warn("falling back to the default port");
        }
    }
    rv
}

fn start_server(text: &str) -> anyhow::Result<u16> {
    let port = configure(text).into_anyhow()?;
    Ok(port)
}

fn main() {
    let mut rv = configure("http");
    println!("port {} ({})", *rv, rv.severity());
    println!("{}", rv.errata());
    rv.clear();

    match start_server("99999") {
        Ok(port) => println!("listening on {port}"),
        Err(error) => println!("anyhow error:\n{error}"),
    }

    let error: anyhow::Error = Erratum::new().with_error("converted with From").into();
    println!("{error:#}");
}
