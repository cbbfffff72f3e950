use crate::document::{Document, Listener};
use crate::loader::WidgetKind;
use crate::nodes::{
    AlertNode, ButtonNode, CheckboxNode, ImageNode, InputNode, SelectNode, TextNode,
};
use crate::render::context::RenderContext;
use crate::render::styling::{IMAGE_STYLE, SEPARATOR_STYLE};
use crate::result::UiResult;
use crate::types::{InputType, TextLevel};
use phf::phf_set;

/// Input types implemented by `weave-input`; the rest use a native `<input>`.
static WEAVE_INPUT_TYPES: phf::Set<&'static str> = phf_set! {
    "text",
    "number",
    "email",
};

pub fn is_weave_input(input_type: InputType) -> bool {
    WEAVE_INPUT_TYPES.contains(input_type.as_str())
}

pub fn render_button<D: Document>(
    render_context: &mut RenderContext<D>,
    button: &ButtonNode,
) -> UiResult<D::Node> {
    render_context.ensure_widget(WidgetKind::Button)?;

    let element = render_context.create_element("weave-button")?;
    render_context.set_attribute(&element, "variant", button.variant.as_str())?;
    render_context.set_flag(&element, "disabled", button.disabled)?;
    render_context.set_text_content(&element, &button.label)?;

    if let Some(on_click) = &button.on_click {
        let on_click = on_click.clone();
        render_context.listen(&element, "click", Listener::new(move |_| on_click.call(())))?;
    }
    Ok(element)
}

pub fn render_input<D: Document>(
    render_context: &mut RenderContext<D>,
    input: &InputNode,
) -> UiResult<D::Node> {
    if is_weave_input(input.input_type) {
        render_weave_input(render_context, input)
    } else {
        render_native_input(render_context, input)
    }
}

fn render_weave_input<D: Document>(
    render_context: &mut RenderContext<D>,
    input: &InputNode,
) -> UiResult<D::Node> {
    render_context.ensure_widget(WidgetKind::Input)?;

    let element = render_context.create_element("weave-input")?;
    render_context.set_attribute(&element, "type", input.input_type.as_str())?;
    render_context.set_attribute(&element, "placeholder", &input.placeholder)?;
    render_context.set_attribute(&element, "value", &input.value)?;
    render_context.set_flag(&element, "disabled", input.disabled)?;

    if let Some(on_change) = &input.on_change {
        let on_change = on_change.clone();
        render_context.listen(
            &element,
            "change",
            Listener::new(move |event| {
                let value = event
                    .detail_value()
                    .or(event.target_value())
                    .unwrap_or_default();
                on_change.call(value.to_string())
            }),
        )?;
    }
    Ok(element)
}

fn render_native_input<D: Document>(
    render_context: &mut RenderContext<D>,
    input: &InputNode,
) -> UiResult<D::Node> {
    render_context.ensure_base_styles()?;

    let element = render_context.create_element("input")?;
    render_context.set_property(&element, "type", input.input_type.as_str())?;
    render_context.set_property(&element, "placeholder", input.placeholder.as_str())?;
    render_context.set_property(&element, "value", input.value.as_str())?;
    render_context.set_property(&element, "disabled", input.disabled)?;

    if let Some(on_change) = &input.on_change {
        let on_change = on_change.clone();
        render_context.listen(
            &element,
            "input",
            Listener::new(move |event| {
                on_change.call(event.target_value().unwrap_or_default().to_string())
            }),
        )?;
    }
    Ok(element)
}

pub fn render_text<D: Document>(
    render_context: &mut RenderContext<D>,
    text: &TextNode,
) -> UiResult<D::Node> {
    render_context.ensure_base_styles()?;

    if text.level == TextLevel::Code {
        let pre = render_context.create_element("pre")?;
        let code = render_context.create_element("code")?;
        render_context.set_text_content(&code, &text.text)?;
        render_context.append_child(&pre, &code)?;
        return Ok(pre);
    }

    let element = render_context.create_element(text.level.as_str())?;
    render_context.set_text_content(&element, &text.text)?;
    Ok(element)
}

pub fn render_alert<D: Document>(
    render_context: &mut RenderContext<D>,
    alert: &AlertNode,
) -> UiResult<D::Node> {
    render_context.ensure_widget(WidgetKind::Banner)?;

    let element = render_context.create_element("weave-banner")?;
    render_context.set_attribute(&element, "variant", alert.alert_type.as_str())?;

    if let Some(title) = &alert.title {
        let title_element = render_context.create_element("span")?;
        render_context.set_attribute(&title_element, "slot", "title")?;
        render_context.set_text_content(&title_element, title)?;
        render_context.append_child(&element, &title_element)?;
    }

    let text = render_context.create_text_node(&alert.text)?;
    render_context.append_child(&element, &text)?;
    Ok(element)
}

pub fn render_image<D: Document>(
    render_context: &mut RenderContext<D>,
    image: &ImageNode,
) -> UiResult<D::Node> {
    let element = render_context.create_element("img")?;
    render_context.set_property(&element, "src", image.src.as_str())?;
    if let Some(alt) = &image.alt {
        render_context.set_property(&element, "alt", alt.as_str())?;
    }
    render_context.set_styles(&element, IMAGE_STYLE)?;
    Ok(element)
}

pub fn render_checkbox<D: Document>(
    render_context: &mut RenderContext<D>,
    checkbox: &CheckboxNode,
) -> UiResult<D::Node> {
    render_context.ensure_widget(WidgetKind::Checkbox)?;

    let element = render_context.create_element("weave-checkbox")?;
    render_context.set_flag(&element, "checked", checkbox.checked)?;
    render_context.set_flag(&element, "disabled", checkbox.disabled)?;
    render_context.set_attribute(&element, "showlabel", "")?;
    render_context.set_attribute(&element, "label", &checkbox.label)?;

    if let Some(on_change) = &checkbox.on_change {
        let on_change = on_change.clone();
        render_context.listen(
            &element,
            "change",
            Listener::new(move |event| on_change.call(event.detail_checked().unwrap_or(false))),
        )?;
    }
    Ok(element)
}

pub fn render_select<D: Document>(
    render_context: &mut RenderContext<D>,
    select: &SelectNode,
) -> UiResult<D::Node> {
    render_context.ensure_widget(WidgetKind::Select)?;

    let element = render_context.create_element("weave-select")?;
    render_context.set_attribute(&element, "value", &select.value)?;
    if !select.placeholder.is_empty() {
        render_context.set_attribute(&element, "placeholder", &select.placeholder)?;
    }
    render_context.set_flag(&element, "disabled", select.disabled)?;

    for option in &select.options {
        let option_element = render_context.create_element("weave-select-option")?;
        render_context.set_attribute(&option_element, "value", &option.value)?;
        render_context.set_text_content(&option_element, &option.label)?;
        render_context.append_child(&element, &option_element)?;
    }

    if let Some(on_change) = &select.on_change {
        let on_change = on_change.clone();
        render_context.listen(
            &element,
            "change",
            Listener::new(move |event| {
                on_change.call(event.detail_value().unwrap_or_default().to_string())
            }),
        )?;
    }
    Ok(element)
}

pub fn render_separator<D: Document>(render_context: &mut RenderContext<D>) -> UiResult<D::Node> {
    let element = render_context.create_element("hr")?;
    render_context.set_styles(&element, SEPARATOR_STYLE)?;
    Ok(element)
}
