//! Instruction text sent to the model for a category and difficulty.

use crate::models::{Category, Difficulty, Language};

/// Number of prompts requested per call
pub const PROMPTS_PER_REQUEST: usize = 5;

fn difficulty_name(difficulty: Difficulty, language: Language) -> &'static str {
    match (difficulty, language) {
        (Difficulty::Easy, Language::PtBr) => "fácil",
        (Difficulty::Medium, Language::PtBr) => "médio",
        (Difficulty::Hard, Language::PtBr) => "difícil",
        (Difficulty::Easy, Language::En) => "easy",
        (Difficulty::Medium, Language::En) => "medium",
        (Difficulty::Hard, Language::En) => "hard",
    }
}

/// Build the generation prompt
pub fn card_prompt(category: Category, difficulty: Difficulty, language: Language) -> String {
    let level = difficulty_name(difficulty, language);
    let description = category.description(language);
    let name = category.wire_name();

    match language {
        Language::PtBr => format!(
            "Você é um gerador de cartas para um jogo de mímica/charades em português brasileiro.\n\n\
             Categoria: {name} ({description})\n\
             Dificuldade: {level}\n\n\
             Para dificuldade {level}:\n\
             - Fácil: palavras/conceitos muito conhecidos e simples de representar\n\
             - Médio: palavras/conceitos conhecidos mas com alguma complexidade\n\
             - Difícil: palavras/conceitos mais complexos, específicos ou abstratos\n\n\
             Gere exatamente {count} prompts para esta categoria e dificuldade.\n\
             Cada prompt deve ser uma palavra ou frase curta (máximo 3 palavras) que possa ser representada por mímica/gestos.\n\n\
             IMPORTANTE: Responda APENAS com um array JSON válido no formato:\n\
             [\"prompt1\", \"prompt2\", \"prompt3\", \"prompt4\", \"prompt5\"]\n\n\
             Não inclua explicações, apenas o array JSON.",
            count = PROMPTS_PER_REQUEST,
        ),
        Language::En => format!(
            "You are a card generator for a charades/mime game in English.\n\n\
             Category: {name} ({description})\n\
             Difficulty: {level}\n\n\
             For {level} difficulty:\n\
             - Easy: very well-known words/concepts that are simple to represent\n\
             - Medium: known words/concepts but with some complexity\n\
             - Hard: more complex, specific or abstract words/concepts\n\n\
             Generate exactly {count} prompts for this category and difficulty.\n\
             Each prompt should be a word or short phrase (maximum 3 words) that can be represented by mime/gestures.\n\n\
             IMPORTANT: Respond ONLY with a valid JSON array in the format:\n\
             [\"prompt1\", \"prompt2\", \"prompt3\", \"prompt4\", \"prompt5\"]\n\n\
             Do not include explanations, just the JSON array.",
            count = PROMPTS_PER_REQUEST,
        ),
    }
}
