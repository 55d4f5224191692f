//! The fixed instruction template and few-shot example turns that seed
//! every classification conversation.

use crate::Content;

const PROMPT_TEMPLATE: &str = "\
I am going to provide you with a trivia question and a list of potential question categories (with abbreviations).
I would like you to output the category abbreviation that the question belongs to.
A question can only belong to a single category. The list of categories and abbreviations is as follows:
  - American History - AMER HIST
  - Art - ART
  - Business and Economics - BUS/ECON
  - Classical Music - CLASS MUSIC
  - Current Events - CURR EVENTS
  - Film and Movies - FILM
  - Food and Drink - FOOD/DRINK
  - Games and Sports - GAMES/SPORT
  - Geography - GEOGRAPHY
  - Language - LANGUAGE
  - Lifestyle - LIFESTYLE
  - Literature - LITERATURE
  - Math - MATH
  - Pop Music - POP MUSIC
  - Science - SCIENCE
  - Television - TELEVISION
  - Theatre - THEATRE
  - World Hist - WORLD HIST

Please output the category for the following question: ";

/// Embed a question in the instruction template.
pub fn wrap_question(question: &str) -> String {
    format!("{PROMPT_TEMPLATE}\"{question}\"")
}

/// Example question → label turns. Labels deliberately cover a spread of
/// categories, including a couple the model tends to confuse (mythology
/// filed under LIFESTYLE, history-of-language under LANGUAGE).
const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "The ideal of humanity found in Friedrich Nietzsche's Thus Spake Zarathustra, when translated into English, is the title of an unrelated movie from 1978. What is that word, which also appears in the titles of numerous other works in film and other media?",
        "LITERATURE",
    ),
    (
        "Audio, The Complex, and THREE are music albums by what ultramarine performance art ensemble, which has been resident off-Broadway in New York since 1991?",
        "THEATRE",
    ),
    (
        "Now commonly used to mean waste or something old, discarded, or of poor quality, what word also once referred to a type of Chinese sailing ship that—belying the current definition—included the most sophisticated and seaworthy ships in the world in the 15th century?",
        "LANGUAGE",
    ),
    (
        "What is the name (or abbreviation) of the unit for measuring heat in which the temperature of one pound of water is raised by one degree Fahrenheit?",
        "SCIENCE",
    ),
    (
        "Today, the Big Three automakers in the United States are Ford, General Motors, and what other company, the result of a 2021 merger between the PSA Group (aka Peugeot) and the Fiat Chrysler conglomerate?",
        "BUS/ECON",
    ),
    (
        "The name of what strongman completes a list that also includes Jackie, Jermaine, Marlon, and Michael?",
        "POP MUSIC",
    ),
    (
        "Throughout the 1980s, in millions of American homes one could find a handheld device on which was printed the name 'Jerrold'. What was this device?",
        "TELEVISION",
    ),
    (
        "A 1642 group portrait of the militia company of Captain Frans Banninck Cocq and of Lieutenant Willem van Ruytenburch is best known today by what name?",
        "ART",
    ),
    (
        "What term used to describe the cohort of women and men who came of age from around World War I to the Great Depression was reportedly coined by Gertrude Stein, and popularized via a frequently recounted conversation with Ernest Hemingway, whose own early works were prototypes for writers of this group?",
        "LITERATURE",
    ),
    (
        "Ocean of wisdom is a frequently cited colloquial translation for what Mongolian-language (or partially Mongolian) phrase, and person?",
        "WORLD HIST",
    ),
    (
        "The dog who was recently banished from the White House after a series of biting incidents has a name that might suggest he is a member of a local sports team (though he isn't). What is this German Shepherd's name?",
        "CURR EVENTS",
    ),
    (
        "According to one story in Greek mythology, what sprang from the body of Medusa upon her death at the hands of Perseus, and was later captured by Bellerophon, helping him defeat the hybrid Chimera? (Proper name required.)",
        "LIFESTYLE",
    ),
];

/// The seed history: every example question wrapped in the template,
/// answered by its label.
pub fn few_shot_history() -> Vec<Content> {
    let mut history = Vec::with_capacity(FEW_SHOT_EXAMPLES.len() * 2);
    for (question, label) in FEW_SHOT_EXAMPLES {
        history.push(Content::user(wrap_question(question)));
        history.push(Content::model(label.to_string()));
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_parser::league::is_known_category;

    #[test]
    fn history_alternates_user_and_model_turns() {
        let history = few_shot_history();
        assert_eq!(history.len(), FEW_SHOT_EXAMPLES.len() * 2);
        for (i, content) in history.iter().enumerate() {
            let expected = if i % 2 == 0 { "user" } else { "model" };
            assert_eq!(content.role, expected);
        }
    }

    #[test]
    fn every_example_label_is_in_the_enumeration() {
        for (_, label) in FEW_SHOT_EXAMPLES {
            assert!(is_known_category(label), "bad example label {label:?}");
        }
    }

    #[test]
    fn wrapped_questions_quote_the_original_text() {
        let wrapped = wrap_question("Who painted The Night Watch?");
        assert!(wrapped.contains("\"Who painted The Night Watch?\""));
        assert!(wrapped.starts_with("I am going to provide you"));
    }
}
