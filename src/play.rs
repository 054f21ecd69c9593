use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::Rng;

use crate::facts::{count_by_difficulty, Difficulty, FactDeck, FACTS};
use crate::i18n::{capitalize, format_percentage, interpolate, Dictionary, Language, Translator};
use crate::resources::RESOURCE_CATEGORIES;
use crate::story::{characters, get_story, CharacterId, Outcome, Step, Story, StorySession};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PlayConfig {
    /// Character to start with. Missing or unknown ids open the roster.
    pub character: Option<String>,
    pub language: Language,
    /// Flat JSON dictionary whose entries override the bundled strings.
    pub dictionary_path: Option<PathBuf>,
}

impl PlayConfig {
    /// Positional arguments: `[character-id] [language] [dictionary.json]`.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let language = match args.get(1) {
            Some(code) => code
                .parse::<Language>()
                .with_context(|| format!("invalid language argument '{code}'"))?,
            None => Language::default(),
        };

        Ok(Self {
            character: args.first().cloned(),
            language,
            dictionary_path: args.get(2).map(PathBuf::from),
        })
    }

    pub fn dictionary(&self) -> Result<Dictionary> {
        let mut dictionary = Dictionary::bundled(self.language)
            .with_context(|| format!("failed to load bundled {} strings", self.language))?;

        if let Some(path) = &self.dictionary_path {
            let overrides = Dictionary::from_path(path)
                .with_context(|| format!("failed to load dictionary {}", path.display()))?;
            info!("Applying {} dictionary overrides", overrides.len());
            dictionary.merge(overrides);
        }

        Ok(dictionary)
    }
}

// ---------------------------------------------------------------------------
// Terminal I/O
// ---------------------------------------------------------------------------

struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Prompt and read one trimmed line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// `a`/`A` -> 0, `b` -> 1, ... within `count`. Digits `1..` work too.
fn parse_choice_index(input: &str, count: usize) -> Option<usize> {
    let mut chars = input.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&i| i < count);
    };

    let index = if c.is_ascii_alphabetic() {
        (c.to_ascii_lowercase() as u8 - b'a') as usize
    } else {
        (c.to_digit(10)? as usize).checked_sub(1)?
    };
    (index < count).then_some(index)
}

fn choice_label(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn is_quit(answer: &str) -> bool {
    ["q", "quit", "exit"]
        .iter()
        .any(|word| answer.eq_ignore_ascii_case(word))
}

fn pick_one_of<W: Write>(output: &mut W, t: &dyn Translator, options: &str) -> Result<()> {
    writeln!(
        output,
        "  {}",
        interpolate(&t.translate("cli.pickOneOf"), &[("options", &options)])
    )?;
    Ok(())
}

/// Where to go once a screen is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Menu,
    Quit,
}

// ---------------------------------------------------------------------------
// Character selection
// ---------------------------------------------------------------------------

fn choose_character<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    t: &dyn Translator,
) -> Result<Option<CharacterId>> {
    let roster = characters(t);

    writeln!(term.output, "\n========================================")?;
    writeln!(term.output, "   {}", t.translate("characters.title"))?;
    writeln!(term.output, "========================================")?;
    for (n, profile) in roster.iter().enumerate() {
        writeln!(term.output, "  [{}] {} ({})", n + 1, profile.name, profile.id)?;
        writeln!(term.output, "      {}", profile.description)?;
        writeln!(
            term.output,
            "      {}: {}",
            t.translate("characters.challenge"),
            profile.challenge
        )?;
    }
    writeln!(term.output, "\n  [q] {}", t.translate("cli.back"))?;

    loop {
        let Some(answer) = term.ask("> ")? else {
            return Ok(None);
        };
        if is_quit(&answer) {
            return Ok(None);
        }

        let picked = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| roster.get(i))
            .map(|profile| profile.id)
            .or_else(|| answer.parse::<CharacterId>().ok());

        match picked {
            Some(id) => return Ok(Some(id)),
            None => writeln!(
                term.output,
                "  {} {}",
                t.translate("story.notFound"),
                t.translate("story.chooseCharacter")
            )?,
        }
    }
}

// ---------------------------------------------------------------------------
// Single play-through
// ---------------------------------------------------------------------------

enum RoundEnd {
    Finished(Outcome),
    Quit,
}

fn show_scene<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    session: &StorySession<'_>,
    t: &dyn Translator,
) -> Result<()> {
    let story = session.story();
    let scene = session.current_scene();

    writeln!(
        term.output,
        "\n[{}] {}  {}: {}/{} ({})",
        story.character_name,
        story.title,
        t.translate("story.progress"),
        session.current_scene_index() + 1,
        story.scenes.len(),
        format_percentage(session.progress_fraction(), 0)
    )?;
    writeln!(term.output, "\n== {} ==", scene.title)?;
    if let Some(image) = &scene.image_ref {
        writeln!(term.output, "({}: {image})", t.translate("cli.image"))?;
    }
    writeln!(term.output, "{}", scene.description)?;
    if let Some(info) = &scene.educational_info {
        writeln!(term.output, "\n  * {} {info}", t.translate("story.didYouKnow"))?;
    }

    writeln!(term.output, "\n{}", t.translate("story.whatWillYouDo"))?;
    for (index, choice) in scene.choices.iter().enumerate() {
        writeln!(term.output, "  [{}] {}", choice_label(index), choice.text)?;
        if let Some(hint) = &choice.hint {
            writeln!(term.output, "      ({hint})")?;
        }
    }
    Ok(())
}

fn play_round<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    session: &mut StorySession<'_>,
    t: &dyn Translator,
) -> Result<RoundEnd> {
    loop {
        show_scene(term, session, t)?;

        let Some(answer) = term.ask("\n> ")? else {
            return Ok(RoundEnd::Quit);
        };
        if answer.eq_ignore_ascii_case("quit") || answer.eq_ignore_ascii_case("exit") {
            return Ok(RoundEnd::Quit);
        }

        let scene = session.current_scene();
        let Some(index) = parse_choice_index(&answer, scene.choices.len()) else {
            let labels = (0..scene.choices.len())
                .map(|i| choice_label(i).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            pick_one_of(&mut term.output, t, &labels)?;
            continue;
        };

        // Only ids shown for this scene are ever passed on, so a rejection
        // here means the story graph and the session disagree.
        let choice_id = scene.choices[index].id.as_str();
        match session.select_choice(choice_id)? {
            Step::Advanced { .. } => continue,
            Step::Completed(outcome) => return Ok(RoundEnd::Finished(outcome)),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary screen
// ---------------------------------------------------------------------------

enum AfterStory {
    Restart,
    ChooseCharacter,
    Quit,
}

fn show_summary<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    story: &Story,
    outcome: Outcome,
    t: &dyn Translator,
) -> Result<()> {
    let (title, message) = match outcome {
        Outcome::Success => (
            t.translate("story.success.title"),
            interpolate(
                &t.translate("story.success.message"),
                &[("character", &story.character_name)],
            ),
        ),
        Outcome::Challenge => (
            t.translate("story.challenge.title"),
            t.translate("story.challenge.message"),
        ),
    };

    writeln!(term.output, "\n========================================")?;
    writeln!(term.output, "  {title}")?;
    writeln!(term.output, "========================================")?;
    writeln!(term.output, "{message}\n")?;
    writeln!(term.output, "{}:", t.translate("story.learned"))?;
    for learning in &story.learnings {
        writeln!(term.output, "  - {learning}")?;
    }
    writeln!(
        term.output,
        "\n  [r] {}    [c] {}    [q] {}\n",
        t.translate("story.tryAgain"),
        t.translate("story.chooseNew"),
        t.translate("cli.quit")
    )?;
    Ok(())
}

fn prompt_after_story<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    t: &dyn Translator,
) -> Result<AfterStory> {
    loop {
        let Some(answer) = term.ask("> ")? else {
            return Ok(AfterStory::Quit);
        };
        match answer.to_lowercase().as_str() {
            "r" => return Ok(AfterStory::Restart),
            "c" => return Ok(AfterStory::ChooseCharacter),
            "q" => return Ok(AfterStory::Quit),
            _ => writeln!(term.output, "  {}", t.translate("cli.afterStory"))?,
        }
    }
}

// ---------------------------------------------------------------------------
// Adventure: roster, play-through, summary
// ---------------------------------------------------------------------------

/// Plays stories until the player backs out of the roster (`Menu`) or
/// quits. `requested` skips the roster for the first story.
fn adventure<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    t: &dyn Translator,
    mut requested: Option<String>,
) -> Result<Flow> {
    loop {
        let story = match requested.take().map(|id| get_story(&id, t)) {
            Some(Ok(story)) => story,
            Some(Err(e)) => {
                warn!("{e}");
                writeln!(term.output, "\n{}", t.translate("story.notFound"))?;
                continue;
            }
            None => match choose_character(term, t)? {
                Some(id) => get_story(id.as_str(), t)?,
                None => return Ok(Flow::Menu),
            },
        };

        let mut session = StorySession::new(&story)?;
        loop {
            let outcome = match play_round(term, &mut session, t)? {
                RoundEnd::Finished(outcome) => outcome,
                RoundEnd::Quit => return Ok(Flow::Quit),
            };
            show_summary(term, &story, outcome, t)?;

            match prompt_after_story(term, t)? {
                AfterStory::Restart => {
                    info!("Player chose to restart");
                    session.restart();
                }
                AfterStory::ChooseCharacter => break,
                AfterStory::Quit => return Ok(Flow::Quit),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fun facts
// ---------------------------------------------------------------------------

fn browse_facts<R: BufRead, W: Write, G: Rng>(
    term: &mut Terminal<R, W>,
    t: &dyn Translator,
    rng: &mut G,
) -> Result<Flow> {
    let mut deck = FactDeck::default();

    writeln!(term.output, "\n========================================")?;
    writeln!(term.output, "   {}", t.translate("facts.title"))?;
    writeln!(term.output, "========================================")?;
    writeln!(term.output, "{}", t.translate("facts.subtitle"))?;
    for difficulty in Difficulty::ALL {
        writeln!(
            term.output,
            "  {}: {}",
            t.translate(&difficulty.stats_key()),
            count_by_difficulty(&FACTS, difficulty)
        )?;
    }

    loop {
        if let Some(fact) = deck.next_fact(rng) {
            debug!("Fact {}/{}: {}", deck.shown(), deck.total(), fact.category);
            writeln!(
                term.output,
                "\n[{}] ({})",
                fact.category,
                capitalize(fact.difficulty.as_str())
            )?;
            writeln!(term.output, "{}", fact.text)?;
            writeln!(term.output, "{}", deck.progress_label(t))?;
        }

        writeln!(
            term.output,
            "\n  [n] {}    [b] {}    [q] {}",
            t.translate("facts.next"),
            t.translate("cli.back"),
            t.translate("cli.quit")
        )?;
        loop {
            let Some(answer) = term.ask("> ")? else {
                return Ok(Flow::Quit);
            };
            match answer.to_lowercase().as_str() {
                "" | "n" => break,
                "b" => return Ok(Flow::Menu),
                "q" | "quit" => return Ok(Flow::Quit),
                _ => pick_one_of(&mut term.output, t, "n, b, q")?,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

fn show_resources<W: Write>(output: &mut W, t: &dyn Translator) -> Result<()> {
    writeln!(output, "\n========================================")?;
    writeln!(output, "   {}", t.translate("cli.resources.title"))?;
    writeln!(output, "========================================")?;
    for category in &RESOURCE_CATEGORIES {
        writeln!(output, "\n== {} ==", category.title)?;
        for item in category.items {
            writeln!(output, "  - {} [{}]", item.title, item.source)?;
            writeln!(output, "    {}", item.description)?;
            writeln!(output, "    {}", item.url)?;
        }
    }
    writeln!(output, "\n{}", t.translate("cli.resources.disclaimer"))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Public entry point: main menu until the player quits
// ---------------------------------------------------------------------------

fn show_menu<W: Write>(output: &mut W, t: &dyn Translator) -> Result<()> {
    writeln!(output, "\n========================================")?;
    writeln!(output, "   {}", t.translate("cli.menu.title"))?;
    writeln!(output, "========================================")?;
    writeln!(output, "  [1] {}", t.translate("cli.menu.adventure"))?;
    writeln!(output, "  [2] {}", t.translate("cli.menu.facts"))?;
    writeln!(output, "  [3] {}", t.translate("cli.menu.resources"))?;
    writeln!(output, "\n  [q] {}", t.translate("cli.quit"))?;
    Ok(())
}

/// Starts straight into `character`'s story when one is given, otherwise
/// at the main menu.
pub fn run<R: BufRead, W: Write, G: Rng>(
    t: &dyn Translator,
    character: Option<&str>,
    input: R,
    output: W,
    rng: &mut G,
) -> Result<()> {
    let mut term = Terminal { input, output };

    let mut flow = match character {
        Some(id) => adventure(&mut term, t, Some(id.to_string()))?,
        None => Flow::Menu,
    };

    while flow == Flow::Menu {
        show_menu(&mut term.output, t)?;
        let Some(answer) = term.ask("> ")? else {
            break;
        };
        flow = match answer.as_str() {
            "1" => adventure(&mut term, t, None)?,
            "2" => browse_facts(&mut term, t, rng)?,
            "3" => {
                show_resources(&mut term.output, t)?;
                Flow::Menu
            }
            a if is_quit(a) => Flow::Quit,
            _ => {
                pick_one_of(&mut term.output, t, "1, 2, 3, q")?;
                Flow::Menu
            }
        };
    }

    writeln!(term.output, "{}", t.translate("cli.thanks"))?;
    Ok(())
}
