use crate::ui::tui;

pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Raw mode must be gone before the report hits stderr.
        let _ = tui::Tui::restore();
        hook(panic_info);
    }));
}
