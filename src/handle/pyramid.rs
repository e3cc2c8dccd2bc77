use super::{CommandContext, CommandHandler};
use crate::core::{CommandArgs, CommandError};
use async_trait::async_trait;

const DEFAULT_SIZE: usize = 3;
const MAX_SIZE: usize = 7;
const USAGE: &str = "Usage: !pyramid [<size>] <text>";
const SIZE_OUT_OF_RANGE: &str = "Pyramid size must be between 1 and 7.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidRequest {
    pub size: usize,
    pub text: String,
}

/// `[<size>] <text>`; a leading all-digit token is the size.
pub fn parse_pyramid(rest: &str) -> Result<CommandArgs, CommandError> {
    let mut tokens = rest.split_whitespace().peekable();
    let size = match tokens.peek() {
        Some(first) if first.chars().all(|c| c.is_ascii_digit()) => {
            let size = first.parse::<usize>().unwrap_or(usize::MAX);
            tokens.next();
            Some(size)
        }
        _ => None,
    };

    let text = match size {
        Some(_) => tokens.collect::<Vec<_>>().join(" "),
        None => rest.trim().to_owned(),
    };
    let size = size.unwrap_or(DEFAULT_SIZE);
    if !(1..=MAX_SIZE).contains(&size) {
        return Err(CommandError::Usage(SIZE_OUT_OF_RANGE.to_owned()));
    }
    if text.is_empty() {
        return Err(CommandError::Usage(USAGE.to_owned()));
    }
    Ok(CommandArgs::Pyramid(PyramidRequest { size, text }))
}

/// `2 * size - 1` lines; line `i` (1-based) repeats the text
/// `min(i, 2 * size - i)` times.
pub fn pyramid_lines(request: &PyramidRequest) -> Vec<String> {
    let height = 2 * request.size - 1;
    (1..=height)
        .map(|i| vec![request.text.as_str(); i.min(2 * request.size - i)].join(" "))
        .collect()
}

pub struct Pyramid;

#[async_trait]
impl CommandHandler for Pyramid {
    async fn run(&self, context: &CommandContext<'_>, args: CommandArgs) -> Result<(), CommandError> {
        let request = match args {
            CommandArgs::Pyramid(request) => request,
            _ => return Err(CommandError::Usage(USAGE.to_owned())),
        };
        for line in pyramid_lines(&request) {
            context.sender.say(&line).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(size: usize, text: &str) -> CommandArgs {
        CommandArgs::Pyramid(PyramidRequest {
            size,
            text: text.to_owned(),
        })
    }

    fn usage_of(result: Result<CommandArgs, CommandError>) -> String {
        match result {
            Err(CommandError::Usage(usage)) => usage,
            other => panic!("expected a usage error, got {:?}", other),
        }
    }

    #[test]
    fn parsing_size_and_text() {
        assert_eq!(parse_pyramid("2 hi").unwrap(), request(2, "hi"));
        assert_eq!(parse_pyramid("5  Kappa   Keepo ").unwrap(), request(5, "Kappa Keepo"));
    }

    #[test]
    fn parsing_default_size() {
        assert_eq!(parse_pyramid("hi there").unwrap(), request(3, "hi there"));
        assert_eq!(parse_pyramid("-2 hi").unwrap(), request(3, "-2 hi"));
        assert_eq!(parse_pyramid("2x hi").unwrap(), request(3, "2x hi"));
    }

    #[test]
    fn size_out_of_range() {
        assert_eq!(usage_of(parse_pyramid("0 hi")), SIZE_OUT_OF_RANGE);
        assert_eq!(usage_of(parse_pyramid("8 hi")), SIZE_OUT_OF_RANGE);
        assert_eq!(
            usage_of(parse_pyramid("99999999999999999999999 hi")),
            SIZE_OUT_OF_RANGE
        );
    }

    #[test]
    fn missing_text() {
        assert_eq!(usage_of(parse_pyramid("")), USAGE);
        assert_eq!(usage_of(parse_pyramid("   ")), USAGE);
        assert_eq!(usage_of(parse_pyramid("4")), USAGE);
    }

    #[test]
    fn line_counts_for_every_size() {
        for size in 1..=MAX_SIZE {
            let lines = pyramid_lines(&PyramidRequest {
                size,
                text: "Kappa".to_owned(),
            });
            assert_eq!(lines.len(), 2 * size - 1);
            for (index, line) in lines.iter().enumerate() {
                let i = index + 1;
                assert_eq!(line.split(' ').count(), i.min(2 * size - i));
            }
            assert_eq!(lines[size - 1].split(' ').count(), size);
        }
    }

    #[test]
    fn multi_word_text_is_repeated_whole() {
        let lines = pyramid_lines(&PyramidRequest {
            size: 2,
            text: "a b".to_owned(),
        });
        assert_eq!(lines, vec!["a b", "a b a b", "a b"]);
    }
}
