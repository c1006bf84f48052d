mod app;
use kattis::{Config, Kattis};
use log::{debug, error, info};
use std::process::exit;

fn load_config(paths: &[String]) -> Config {
    let r = if paths.is_empty() {
        debug!("trying the default .kattisrc locations");
        Config::load(Config::default_paths())
    } else {
        Config::load(paths)
    };
    r.unwrap_or_else(|e| {
        error!("can not load config: {}", e);
        exit(1);
    })
}

fn main() {
    use app::Parser;
    let args = app::App::parse();
    let v = usize::from(args.verbose).saturating_add(1);
    let modules = &[module_path!(), "reqwest"];
    stderrlog::new()
        .modules(modules.iter().cloned())
        .verbosity(v)
        .init()
        .unwrap();

    let cfg = load_config(&args.config);
    let kattis = Kattis::new(cfg).unwrap_or_else(|e| {
        error!("can not build Kattis client: {}", e);
        exit(1);
    });
    info!("using site {}", kattis.hostname());

    if args.login {
        kattis.ensure_authenticated().unwrap_or_else(|e| {
            error!("failed to login: {}", e);
            exit(1);
        });
        let user = kattis.username().unwrap_or("?");
        println!("logged in as {}", user);
    }

    let contest = args.contest.as_deref();

    if let Some(c) = contest {
        println!("{}", kattis.contest(c).url());
    }

    if let Some(p) = &args.problem {
        println!("{}", kattis.problem(p).url(contest));
    }

    if let Some(s) = &args.submission {
        println!("{}", kattis.submission(s).url(contest));
    }

    if let Some(u) = &args.user {
        let user = if u == "me" {
            kattis.me().unwrap_or_else(|e| {
                error!("{}", e);
                exit(1);
            })
        } else {
            kattis.user(u)
        };
        println!("{}", user.url());
    }
}
