pub(super) const ROOT_LONG_ABOUT: &str = "\
Extract StrongHelp manuals into folders and keep them in sync

Strongex reads a StrongHelp manual and compares its contents with a folder on disc.
It reports every difference and, with --update, changes the folder to match the
manual. Running it again after an update reports nothing.

NAMING:

  Objects are written with their RISC OS filetype as a ,xxx suffix, so a text file
  called README in the manual becomes README,fff on disc. Directories get no suffix.
  The '.' and '/' characters are swapped, so the manual object index/html is written
  as index.html,xxx.

  Disc files with no suffix are treated as Data (&FFD).

REPORT:

  Each differing object is listed with a status code, its kind and its path within
  the manual:

    C  file $.README
    A  dir  $.Docs
    A  file $.Docs.Intro

    1 directory added
    1 file added
    1 file changed

    Fingerprint: ...

  Status codes:
    A   Added - in the manual but not on disc
    D   Deleted - on disc but not in the manual
    T   Filetype differs
    S   Size differs
    C   Contents differ
    .   Identical (shown with --all)

UPDATING:

  --update writes added and changed files, creates added directories and removes
  anything on disc that is not in the manual. Changed files are replaced rather than
  patched. The first failure stops the update, and changes already made are kept.

FINGERPRINTS:

  Every report that finds differences ends with a fingerprint, a hash of the
  changes it lists. Passing it back with --fingerprint makes strongex check that
  the changes are still the same before it writes anything. To apply exactly the
  changes you reviewed:

    $ strongex -s Manual,3d6 -o Manual > review.txt
    $ FP=$(grep '^Fingerprint:' review.txt | cut -d' ' -f2)
    $ strongex -s Manual,3d6 -o Manual --update --fingerprint $FP

  If the manual or folder changed in between, the fingerprint will not match and
  nothing is written.

EXIT CODES:

  0: Success, whether or not differences were found
  1: An error was reported, including damaged free space in the manual
  2: Invalid arguments

LOGGING:

  Logs go to stderr and the report to stdout. Use -v for progress and -vv for details
  of every block read. RUST_LOG and --log-level set the level directly.

EXAMPLES:

  # See what differs between a manual and its extracted folder
  $ strongex --source Manual,3d6 --out Manual

  # Include unchanged objects
  $ strongex -s Manual,3d6 -o Manual --all

  # Extract or refresh the folder
  $ strongex -s Manual,3d6 -o Manual --update
";
