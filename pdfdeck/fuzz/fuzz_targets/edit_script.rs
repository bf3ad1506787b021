#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfdeck::EditCommand;

fuzz_target!(|data: &[u8]| {
    let Ok(script) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(commands) = EditCommand::parse_script(script) else {
        return;
    };

    // Every parsed command prints back as something that parses to itself.
    for command in commands {
        let reparsed: EditCommand = command.to_string().parse().unwrap();
        assert_eq!(reparsed, command);
    }
});
