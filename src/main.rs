// Use the library crate (whose name is defined in Cargo.toml)
use sprig::{Environment, evaluate, parse_tokens, tokenize};

const PROGRAMS: [&str; 2] = ["(+ 10.5 -1.07)", "(+ 10.5 -1.07 (* 10 (+ -1 1)))"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let env = Environment::new_global_populated();
    for (i, input) in PROGRAMS.iter().enumerate() {
        let n = i + 1;
        let tokens = tokenize(input);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
        println!("tokens{} == {:?}", n, texts);

        match parse_tokens(&tokens, 0) {
            Ok((node, consumed)) => {
                println!("{} parsed{} == {}", consumed, n, node);
                match evaluate(&node, &env) {
                    Ok(result) => println!(
                        "result{} == {}\n\ttype: {}",
                        n,
                        result,
                        result.kind.type_name()
                    ),
                    Err(e) => {
                        if e.pretty_print(input).is_err() {
                            eprintln!("Error: {}", e);
                        }
                    }
                }
            }
            Err(e) => {
                if e.pretty_print(input).is_err() {
                    eprintln!("Parse Error: {}", e);
                }
            }
        }
    }
}
