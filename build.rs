use std::env;

fn main() {
    // Overrun diagnostic threshold for cyclic tasks (microseconds).
    // Used as the compiled default; can be changed at runtime through the
    // `cyclic_max_cpu_time` parameter.
    match env::var("CYCLIC_MAX_CPU_TIME_US") {
        Ok(value) if is_decimal(&value) => {
            println!("cargo:rustc-env=CYCLIC_MAX_CPU_TIME_US={}", value);
            println!(
                "cargo:warning=Using CYCLIC_MAX_CPU_TIME_US from environment: {}",
                value
            );
        }
        Ok(value) => {
            println!(
                "cargo:warning=Ignoring invalid CYCLIC_MAX_CPU_TIME_US '{}', using 1000",
                value
            );
            println!("cargo:rustc-env=CYCLIC_MAX_CPU_TIME_US=1000");
        }
        Err(_) => {
            println!("cargo:rustc-env=CYCLIC_MAX_CPU_TIME_US=1000");
        }
    }

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=CYCLIC_MAX_CPU_TIME_US");
}

fn is_decimal(value: &str) -> bool {
    !value.is_empty() && value.len() <= 9 && value.bytes().all(|b| b.is_ascii_digit())
}
