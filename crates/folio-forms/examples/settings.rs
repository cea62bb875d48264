//! Drives a settings-style form headlessly and prints every structural
//! edit the host table would receive.
//!
//! Run with logging to watch the reconciler work:
//!
//! ```sh
//! RUST_LOG=folio_forms=debug cargo run --example settings
//! ```

use std::sync::Arc;

use folio_forms::prelude::*;

#[derive(Clone)]
struct Settings {
    airplane_mode: bool,
    wifi_enabled: bool,
    network: String,
}

/// A host that prints edits instead of animating a real table.
struct ConsoleHost;

impl TableHost for ConsoleHost {
    fn begin_updates(&mut self) {
        println!("-- begin updates");
    }

    fn insert_sections(&mut self, indices: &[usize], _animation: EditAnimation) {
        println!("   insert sections {indices:?}");
    }

    fn delete_sections(&mut self, indices: &[usize], _animation: EditAnimation) {
        println!("   delete sections {indices:?}");
    }

    fn insert_rows(&mut self, paths: &[RowPath], _animation: EditAnimation) {
        println!("   insert rows {paths:?}");
    }

    fn delete_rows(&mut self, paths: &[RowPath], _animation: EditAnimation) {
        println!("   delete rows {paths:?}");
    }

    fn refresh_footer(&mut self, section: usize, footer: Option<&str>) {
        println!("   footer [{section}] = {footer:?}");
    }

    fn end_updates(&mut self) {
        println!("-- end updates");
    }
}

fn schema() -> Form<Settings> {
    form(vec![
        section(
            vec![control_row(
                "Airplane Mode",
                toggle(lens!(Settings, airplane_mode)),
                None,
            )],
            None,
            None,
        ),
        section(
            vec![
                control_row("Wi-Fi", toggle(lens!(Settings, wifi_enabled)), None),
                nested_text_row("Network", lens!(Settings, network)),
            ],
            None,
            Some(getter!(Settings, airplane_mode).not()),
        ),
    ])
}

fn print_table(controller: &Arc<FormController>) {
    println!("{}", controller.title());
    for section in 0..controller.visible_section_count() {
        println!("  section {section}");
        for row in 0..controller.visible_row_count(section) {
            let cell = controller.cell_at(RowPath::new(section, row));
            println!("    {} | {}", cell.title.get(), cell.detail.get());
        }
    }
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let driver = FormDriver::new(
        "Settings",
        Settings {
            airplane_mode: false,
            wifi_enabled: true,
            network: "home-5G".into(),
        },
        schema(),
    );
    driver.attach_host(Box::new(ConsoleHost));
    print_table(driver.controller());

    println!("flipping airplane mode on:");
    driver.change(|s| s.airplane_mode = true);
    print_table(driver.controller());

    println!("flipping airplane mode off again:");
    driver.change(|s| s.airplane_mode = false);
    print_table(driver.controller());
}
