// Cross-cutting prompt fragments. Feature-specific templates live in the
// prompts.rs next to the code that sends them.

/// Formatting facet appended to every generation prompt: raw glyphs plus
/// standard punctuation, no markup, no numbering.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
【标点符号要求】
- 必须使用正确的中文标点符号：句号（。）、逗号（，）、问号（？）、感叹号（！）
- 每句话必须有标点符号

【输出格式】
只输出纯汉字文章（必须带标点符号），不要拼音、不要编号、不要标题、不要任何Markdown或额外标记。";
