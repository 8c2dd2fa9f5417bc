use serde::Serialize;
use tracing::{debug, info};

use super::{check_selection, reject, Outcome, ReviewError};
use crate::metrics::{NOTHING_DUE, QUIZ_ITEMS_SERVED};
use crate::repository::{AnnotatedSentence, RepositoryError, ReviewRepository};
use crate::selection::{QuizDirection, SelectionConfig};
use crate::session::ReviewSession;
use crate::word::{mask_sentence, WordRecord};

/// Placeholder shown in cloze prompts.
const CLOZE_PLACEHOLDER: &str = "...";

/// One quiz item ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NextQuizItem {
    /// `0` when nothing is due.
    pub term_id: i64,
    pub term_text: String,
    /// Expected answer.
    pub solution: String,
    /// Plain-text prompt.
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotatedSentence>,
}

impl NextQuizItem {
    /// The item returned when no word is due.
    pub fn nothing_due() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.term_id == 0
    }
}

/// Picks the next due word of a selection and renders it as a quiz item.
pub struct GetNextWord<'a> {
    repository: &'a dyn ReviewRepository,
}

impl<'a> GetNextWord<'a> {
    pub fn new(repository: &'a dyn ReviewRepository) -> Self {
        Self { repository }
    }

    /// The previously shown word (from the session) is skipped, and the
    /// chosen word becomes the new previous word.
    pub fn execute(
        &self,
        config: &SelectionConfig,
        session: &ReviewSession<'_>,
    ) -> Result<Outcome<NextQuizItem>, RepositoryError> {
        if !config.is_valid() {
            return Ok(reject(ReviewError::InvalidConfiguration));
        }

        let checked = match check_selection(self.repository, config)? {
            Ok(checked) => checked,
            Err(error) => return Ok(reject(error)),
        };

        let previous = session.last_word_id();
        let Some(word) = self
            .repository
            .find_next_word_for_review(&checked.fragment, previous)?
        else {
            NOTHING_DUE.inc();
            debug!(language = checked.language_id, excluded = previous, "Nothing due");
            return Ok(Outcome::Success(NextQuizItem::nothing_due()));
        };

        let item = self.render(config, word)?;

        session.set_last_word_id(item.term_id);
        if let Some(kind) = config.review_key() {
            QUIZ_ITEMS_SERVED.with_label_values(&[kind.as_str()]).inc();
        }
        info!(term_id = item.term_id, review_type = config.review_type().code(), "Serving quiz item");
        Ok(Outcome::Success(item))
    }

    fn render(
        &self,
        config: &SelectionConfig,
        word: WordRecord,
    ) -> Result<NextQuizItem, RepositoryError> {
        let direction = config.review_type().direction();
        let translation = word.first_translation().unwrap_or_default();

        let solution = match direction {
            QuizDirection::TermToTranslation => translation.clone(),
            QuizDirection::TranslationToTerm | QuizDirection::Cloze => word.text.clone(),
        };

        let word_prompt = match direction {
            QuizDirection::TermToTranslation => word.text.clone(),
            QuizDirection::TranslationToTerm | QuizDirection::Cloze => translation.clone(),
        };

        if config.word_mode() {
            return Ok(NextQuizItem {
                term_id: word.id,
                term_text: word.text,
                solution,
                group: word_prompt,
                sentence: None,
                annotations: None,
            });
        }

        let (sentence, annotations) = if word.needs_new_sentence() {
            let annotated = self
                .repository
                .get_sentence_with_annotations(&word)?
                .filter(AnnotatedSentence::has_target);
            (annotated.as_ref().map(|s| s.text.clone()), annotated)
        } else {
            (word.sentence.clone(), None)
        };

        let group = match &sentence {
            Some(sentence) => {
                let replacement = match direction {
                    QuizDirection::TermToTranslation => word.text.as_str(),
                    QuizDirection::TranslationToTerm => translation.as_str(),
                    QuizDirection::Cloze => CLOZE_PLACEHOLDER,
                };
                mask_sentence(sentence, replacement)
            }
            None => word_prompt,
        };

        Ok(NextQuizItem {
            term_id: word.id,
            term_text: word.text,
            solution,
            group,
            sentence,
            annotations,
        })
    }
}
