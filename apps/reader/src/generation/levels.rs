//! Static HSK constraints fed verbatim into every generation prompt.
//!
//! Constructed at compile time, never mutated. Lookup is total over `Level`.

use crate::models::Level;

/// Vocabulary, grammar and topic constraints for one HSK level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSpec {
    pub level: Level,
    pub vocabulary_ceiling: &'static str,
    pub grammar_points: &'static [&'static str],
    pub topics: &'static str,
    pub story_archetype: &'static str,
}

const SUMMARY_GRAMMAR_CHARS: usize = 100;

static LEVEL_SPECS: [LevelSpec; 5] = [
    LevelSpec {
        level: Level::Hsk1,
        vocabulary_ceiling: "150词",
        grammar_points: &[
            "主谓宾", "的", "很", "吗", "呢", "这那", "想", "可以", "会（能力）", "在+地点", "有/没有",
        ],
        topics: "问候、自我介绍、家庭成员、数字、时间、简单购物、基本爱好",
        story_archetype: "日常生活小故事（如：买水果、问路、介绍家人）",
    },
    LevelSpec {
        level: Level::Hsk2,
        vocabulary_ceiling: "300词（累计）",
        grammar_points: &[
            "了（完成）", "过（经历）", "在+动词", "着", "比", "越…越…", "刚", "正在", "从…到…",
            "虽然…但是…", "因为…所以…",
        ],
        topics: "日常生活、简单工作、基本旅行、天气、身体状况",
        story_archetype: "简单生活故事（如：去旅行、看医生、过生日）",
    },
    LevelSpec {
        level: Level::Hsk3,
        vocabulary_ceiling: "600词（累计）",
        grammar_points: &[
            "除了…以外", "一边…一边…", "只要…就…", "尽管…还是…", "反而", "难道", "即使…也…",
            "把字句", "被字句",
        ],
        topics: "学校生活、工作场景、旅行经历、健康养生、节日庆典",
        story_archetype: "有趣的经历故事（如：学习中文、中国节日、健康生活）",
    },
    LevelSpec {
        level: Level::Hsk4,
        vocabulary_ceiling: "1200词（累计）",
        grammar_points: &[
            "所谓", "毕竟", "简直", "竟然", "看来", "显然", "幸亏", "难免", "至于", "从而",
            "由此可见", "相比之下", "动不动就", "连…都…",
        ],
        topics: "职场、社会现象、文化差异、科技生活、环境问题",
        story_archetype: "文化故事（如：中国传统文化、历史人物、名胜古迹）",
    },
    LevelSpec {
        level: Level::Hsk5,
        vocabulary_ceiling: "2500词（累计）",
        grammar_points: &[
            "成语", "四字词语", "以至于", "之所以…是因为…", "宁可…也不…", "无论…都…",
            "与其…不如…",
        ],
        topics: "深度社会议题、传统文化、科技发展、哲学思考、职业规划",
        story_archetype: "深度文化故事（如：中国历史典故、文化传统、社会现象）",
    },
];

/// Returns the constraint record for `level`.
pub fn level_spec(level: Level) -> &'static LevelSpec {
    &LEVEL_SPECS[usize::from(level.number() - 1)]
}

impl LevelSpec {
    /// Grammar points joined the way they appear in prompts.
    pub fn grammar_line(&self) -> String {
        self.grammar_points.join("、")
    }

    /// Short level card: ceiling, grammar clipped to 100 glyphs, topics.
    pub fn summary(&self) -> String {
        let grammar = self.grammar_line();
        let clipped: String = grammar.chars().take(SUMMARY_GRAMMAR_CHARS).collect();
        format!(
            "{} 级别标准\n词汇量：{}\n语法要点：{}...\n话题范围：{}",
            self.level, self.vocabulary_ceiling, clipped, self.topics
        )
    }
}
