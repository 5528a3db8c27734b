// All LLM prompt constants for article generation.
// Reuses the cross-cutting format fragment from llm_client::prompts.

/// System prompt for article generation.
pub const GENERATION_SYSTEM: &str = "你是一位经验丰富的对外汉语教师，\
    擅长为不同HSK水平的学生创作引人入胜、难度合适的中文阅读材料。";

/// Level facet. Replace: {level_number}, {vocabulary_ceiling}, {grammar}, {topics}
pub const LEVEL_FACET_TEMPLATE: &str = "\
【HSK{level_number}级别标准】
- 词汇量：{vocabulary_ceiling}
- 允许使用的语法：{grammar}
- 话题范围：{topics}";

/// Required-vocabulary facet. Replace: {words}
pub const VOCABULARY_FACET_TEMPLATE: &str = "\
必须自然地包含以下所有生词，每个生词至少出现1次，最好出现1-2次：{words}";

/// Length facet. Replace: {target_chars}
pub const LENGTH_FACET_TEMPLATE: &str = "字数要求：{target_chars}字左右";

/// Full article prompt.
/// Replace: {level_facet}, {level_number}, {story_archetype}, {vocabulary_facet},
///          {length_facet}, {format_facet}
pub const ARTICLE_PROMPT_TEMPLATE: &str = "\
{level_facet}

【创作要求】
请创作一篇严格符合HSK{level_number}水平的趣味短文：
1. 内容形式：写成{story_archetype}，要有完整的故事情节或清晰的逻辑结构
2. 词汇要求：只能使用HSK1到HSK{level_number}范围内的词汇
3. 语法要求：只能使用上述允许的语法结构
4. 生词融入：{vocabulary_facet}
5. {length_facet}
6. 写作风格：语言生动、有画面感、逻辑清晰、易于理解

{format_facet}";
