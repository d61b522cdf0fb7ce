use clap::Parser;
use clap::ValueEnum;
use dk_builder::BuilderConfig;
use dk_builder::TreeBuilder;
use dk_component::ComponentNode;
use dk_core::KitResult;
use dk_css::declarations;
use dk_dom::Document;
use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Html,
    Css,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "domkit-demo")]
#[command(about = "Mounts a small component tree and prints the resulting document")]
#[command(version)]
struct Cli {
    /// Id of the host element the tree is mounted under
    #[arg(long, default_value = "root")]
    anchor: String,

    /// Seed for reproducible class names
    #[arg(long)]
    seed: Option<u64>,

    /// What to print after mounting
    #[arg(long, value_enum, default_value_t = Output::Both)]
    output: Output,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(code = error.code(), "mount failed");
            eprintln!("domkit-demo: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> KitResult<()> {
    let document = Document::new();
    let root = document.create_element("div");
    root.set_id("root");
    document.body().append_child(&root)?;

    let config = BuilderConfig {
        name_seed: cli.seed,
        ..BuilderConfig::default()
    };
    let mut builder = TreeBuilder::with_config(&document, config)?;

    let clicks = Rc::new(Cell::new(0_u32));
    let mut button = greeting_button(&document, Rc::clone(&clicks));
    let summary = builder.mount(cli.anchor.as_str(), &mut button)?;
    tracing::info!(
        components = summary.components,
        rules = summary.rules(),
        "demo tree mounted"
    );

    let invoked = button.element().dispatch_click();
    tracing::info!(invoked, clicks = clicks.get(), "dispatched a click on the button");

    if matches!(cli.output, Output::Html | Output::Both) {
        println!("{}", document.to_html());
    }
    if matches!(cli.output, Output::Css | Output::Both) {
        print!("{}", builder.sink().text());
    }

    Ok(())
}

fn greeting_button(document: &Document, clicks: Rc<Cell<u32>>) -> ComponentNode {
    let heading = ComponentNode::new(document, "Title", "h1")
        .with_style(declarations![
            "fontFamily" => "sans-serif",
            "fontSize" => 30,
            "fontWeight" => "700",
            "color" => "white",
        ])
        .with_content("HELLO, WORLD!");

    ComponentNode::new(document, "Button", "button")
        .with_style(declarations![
            "backgroundColor" => "red",
            "width" => 550,
            "padding" => "4px 8px",
            "borderRadius" => 4,
            "border" => "none",
            "cursor" => "pointer",
        ])
        .with_hover_style([("filter", "brightness(125%)")])
        .with_class_name("primary")
        .with_click_handler(move |event| {
            event.prevent_default();
            clicks.set(clicks.get() + 1);
            tracing::info!(target_node = event.target(), "button clicked");
        })
        .with_content(heading)
}
