#![no_main]

use libfuzzer_sys::fuzz_target;
use metaprobe_core::template::placeholders;
use metaprobe_core::{render_template, ExaFormatter, QueryParams, TemplateError};

fuzz_target!(|data: &[u8]| {
    let Ok(template) = std::str::from_utf8(data) else {
        return;
    };

    // Bind every placeholder so only syntax errors remain possible.
    let Ok(names) = placeholders(template) else {
        return;
    };
    let params = names
        .iter()
        .fold(QueryParams::new(), |params, name| params.literal(name.as_str(), template));

    match render_template(template, &params, &ExaFormatter::default()) {
        Ok(_) => {}
        Err(TemplateError::Syntax { .. }) => panic!("render rejected a template placeholders() accepted: {template:?}"),
        Err(err) => panic!("fully bound template failed: {err}"),
    }
});
