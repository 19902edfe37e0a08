use linelog::{Info, Service};

const INFO: Info = Info {
    description: "linelog service demo",
    package_name: env!("CARGO_PKG_NAME"),
    build_version: env!("CARGO_PKG_VERSION"),
    build_type: if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    },
    git_hash: "",
};

// cargo run --example service -- --color always --log-verbosity 1 hello world
fn main() {
    let service = match Service::new(std::env::args(), INFO) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let code = service.run(|args| {
        linelog::info!("args={args:?}");
        linelog::info!(v = 1; "shown with --log-verbosity 1");
        linelog::debug!("debug builds only");
        let handles: Vec<_> = (0..3)
            .map(|i| std::thread::spawn(move || linelog::warn!("Hello from thread {i}")))
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        if args.is_empty() {
            return Err("expected at least one argument");
        }
        Ok(0)
    });
    std::process::exit(code);
}
